//! Normalizador de estructuras.
//!
//! Convierte la representación entrante (SMILES) en la forma canónica que se
//! usa como clave de caché y como input para todos los backends:
//!
//! 1. Recorta espacios y descarta el campo de título (todo lo que sigue al
//!    primer espacio en blanco).
//! 2. Valida léxicamente: símbolos de elementos conocidos, átomos entre
//!    corchetes bien formados, ramas balanceadas y cierres de anillo pareados.
//! 3. Elimina estereoquímica (`/`, `\`, `@`, `@@`).
//! 4. Elimina sales: conserva el fragmento con más átomos pesados (el primero
//!    en caso de empate). Si un cierre de anillo cruza fragmentos se conservan
//!    todos.
//!
//! La función es pura y determinista, y `normalize(normalize(x)) == normalize(x)`.
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::DomainError;

/// Estructura normalizada. Sólo se construye a través de [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CanonicalStructure(String);

impl CanonicalStructure {
    pub fn as_str(&self) -> &str {
        &self.0
    }
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalStructure {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

const ELEMENTS: &[&str] = &[
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar", "K", "Ca",
    "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As", "Se", "Br", "Kr", "Rb", "Sr", "Y",
    "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce",
    "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir",
    "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm",
    "Bk", "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh", "Fl", "Mc",
    "Lv", "Ts", "Og",
];

// Aromáticos válidos dentro de corchetes (los de dos letras primero).
const AROMATIC_BRACKET: &[&str] = &["se", "as", "te", "b", "c", "n", "o", "p", "s"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Atom { text: String, heavy: bool },
    Bond(char),
    Open,
    Close,
    Ring(String),
    Dot,
}

impl Token {
    fn is_stereo_bond(&self) -> bool {
        matches!(self, Token::Bond('/') | Token::Bond('\\'))
    }

    fn render(&self, out: &mut String) {
        match self {
            Token::Atom { text, .. } | Token::Ring(text) => out.push_str(text),
            Token::Bond(c) => out.push(*c),
            Token::Open => out.push('('),
            Token::Close => out.push(')'),
            Token::Dot => out.push('.'),
        }
    }
}

fn invalid(msg: impl Into<String>) -> DomainError {
    DomainError::InvalidStructure(msg.into())
}

/// Normaliza una estructura cruda. Falla con `InvalidStructure` si no es un
/// SMILES válido.
pub fn normalize(raw: &str) -> Result<CanonicalStructure, DomainError> {
    let smiles = raw.split_whitespace().next().ok_or_else(|| invalid("empty structure"))?;
    let tokens = tokenize(smiles)?;
    let ring_spans_fragments = validate(&tokens)?;
    let tokens: Vec<Token> = tokens.into_iter().filter(|t| !t.is_stereo_bond()).collect();
    let kept = if ring_spans_fragments { tokens } else { largest_fragment(tokens) };
    let mut out = String::with_capacity(smiles.len());
    for t in &kept {
        t.render(&mut out);
    }
    Ok(CanonicalStructure(out))
}

fn tokenize(smiles: &str) -> Result<Vec<Token>, DomainError> {
    let chars: Vec<char> = smiles.chars().collect();
    let mut tokens = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        match c {
            '[' => {
                let len = chars[i + 1..].iter()
                                        .position(|&ch| ch == ']')
                                        .ok_or_else(|| invalid(format!("unclosed bracket atom at position {i}")))?;
                let inner: String = chars[i + 1..i + 1 + len].iter().collect();
                tokens.push(parse_bracket_atom(&inner)?);
                i += len + 2;
                continue;
            }
            '(' => tokens.push(Token::Open),
            ')' => tokens.push(Token::Close),
            '.' => tokens.push(Token::Dot),
            '-' | '=' | '#' | '$' | ':' | '/' | '\\' => tokens.push(Token::Bond(c)),
            '0'..='9' => tokens.push(Token::Ring(c.to_string())),
            '%' => match (next, chars.get(i + 2)) {
                (Some(a), Some(b)) if a.is_ascii_digit() && b.is_ascii_digit() => {
                    tokens.push(Token::Ring(format!("%{a}{b}")));
                    i += 3;
                    continue;
                }
                _ => return Err(invalid(format!("malformed ring label at position {i}"))),
            },
            '*' => tokens.push(Token::Atom { text: "*".into(), heavy: false }),
            'B' if next == Some('r') => {
                tokens.push(Token::Atom { text: "Br".into(), heavy: true });
                i += 2;
                continue;
            }
            'C' if next == Some('l') => {
                tokens.push(Token::Atom { text: "Cl".into(), heavy: true });
                i += 2;
                continue;
            }
            'B' | 'C' | 'N' | 'O' | 'P' | 'S' | 'F' | 'I' | 'b' | 'c' | 'n' | 'o' | 'p' | 's' => {
                tokens.push(Token::Atom { text: c.to_string(), heavy: true })
            }
            _ => return Err(invalid(format!("unexpected character '{c}' at position {i}"))),
        }
        i += 1;
    }
    Ok(tokens)
}

/// Parsea el contenido de `[...]` y lo re-emite sin quiralidad.
fn parse_bracket_atom(inner: &str) -> Result<Token, DomainError> {
    let bad = || invalid(format!("malformed bracket atom [{inner}]"));
    let chars: Vec<char> = inner.chars().collect();
    let mut i = 0;
    let mut out = String::from("[");

    while i < chars.len() && chars[i].is_ascii_digit() {
        out.push(chars[i]);
        i += 1;
    }

    let rest: String = chars[i..].iter().collect();
    let symbol = if rest.starts_with('*') {
        "*".to_string()
    } else if rest.starts_with(|c: char| c.is_ascii_uppercase()) {
        let two: String = rest.chars().take(2).collect();
        let one: String = rest.chars().take(1).collect();
        if two.len() == 2 && ELEMENTS.contains(&two.as_str()) {
            two
        } else if ELEMENTS.contains(&one.as_str()) {
            one
        } else {
            return Err(bad());
        }
    } else {
        AROMATIC_BRACKET.iter()
                        .find(|a| rest.starts_with(**a))
                        .map(|a| a.to_string())
                        .ok_or_else(bad)?
    };
    i += symbol.len();
    out.push_str(&symbol);

    // quiralidad: se descarta
    while i < chars.len() && chars[i] == '@' {
        i += 1;
    }

    if i < chars.len() && chars[i] == 'H' {
        out.push('H');
        i += 1;
        while i < chars.len() && chars[i].is_ascii_digit() {
            out.push(chars[i]);
            i += 1;
        }
    }

    if i < chars.len() && (chars[i] == '+' || chars[i] == '-') {
        let sign = chars[i];
        out.push(sign);
        i += 1;
        while i < chars.len() && (chars[i] == sign || chars[i].is_ascii_digit()) {
            out.push(chars[i]);
            i += 1;
        }
    }

    if i < chars.len() && chars[i] == ':' {
        out.push(':');
        i += 1;
        let start = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            out.push(chars[i]);
            i += 1;
        }
        if i == start {
            return Err(bad());
        }
    }

    if i != chars.len() {
        return Err(bad());
    }
    out.push(']');
    let heavy = symbol != "H" && symbol != "*";
    Ok(Token::Atom { text: out, heavy })
}

/// Valida la gramática. Devuelve `true` si algún cierre de anillo cruza
/// fragmentos separados por `.`.
fn validate(tokens: &[Token]) -> Result<bool, DomainError> {
    let mut depth = 0usize;
    let mut prev: Option<&Token> = None;
    let mut open_rings: HashMap<&str, usize> = HashMap::new();
    let mut fragment = 0usize;
    let mut atoms_in_fragment = 0usize;
    let mut spans = false;
    // el enlace previo cuelga de un átomo o de otro cierre, no de '('
    let mut bond_on_atom = false;

    let after_atom = |p: Option<&Token>| matches!(p, Some(Token::Atom { .. }) | Some(Token::Ring(_)) | Some(Token::Close));

    for t in tokens {
        match t {
            Token::Atom { .. } => atoms_in_fragment += 1,
            Token::Bond(c) => {
                if !after_atom(prev) && prev != Some(&Token::Open) {
                    return Err(invalid(format!("bond '{c}' without a preceding atom")));
                }
                bond_on_atom = matches!(prev, Some(Token::Atom { .. }) | Some(Token::Ring(_)));
            }
            Token::Open => {
                if !after_atom(prev) {
                    return Err(invalid("branch without a preceding atom"));
                }
                depth += 1;
            }
            Token::Close => {
                if depth == 0 {
                    return Err(invalid("unbalanced ')'"));
                }
                if !after_atom(prev) {
                    return Err(invalid("empty or dangling branch"));
                }
                depth -= 1;
            }
            Token::Ring(label) => {
                let prev_ok = after_atom(prev) && prev != Some(&Token::Close)
                              || matches!(prev, Some(Token::Bond(_))) && bond_on_atom;
                if !prev_ok || atoms_in_fragment == 0 {
                    return Err(invalid(format!("ring closure {label} without a preceding atom")));
                }
                match open_rings.remove(label.as_str()) {
                    Some(opened_in) => spans |= opened_in != fragment,
                    None => {
                        open_rings.insert(label.as_str(), fragment);
                    }
                }
            }
            Token::Dot => {
                if depth != 0 {
                    return Err(invalid("fragment separator inside a branch"));
                }
                if atoms_in_fragment == 0 || matches!(prev, Some(Token::Bond(_))) {
                    return Err(invalid("empty fragment"));
                }
                fragment += 1;
                atoms_in_fragment = 0;
                prev = None;
                continue;
            }
        }
        prev = Some(t);
    }

    if depth != 0 {
        return Err(invalid("unbalanced '('"));
    }
    if let Some(label) = open_rings.keys().next() {
        return Err(invalid(format!("unclosed ring {label}")));
    }
    if atoms_in_fragment == 0 || matches!(prev, Some(Token::Bond(_))) {
        return Err(invalid("structure ends without an atom"));
    }
    Ok(spans)
}

fn largest_fragment(tokens: Vec<Token>) -> Vec<Token> {
    let fragments: Vec<Vec<Token>> = tokens.split(|t| *t == Token::Dot).map(<[Token]>::to_vec).collect();
    if fragments.len() < 2 {
        return tokens;
    }
    let heavy = |f: &Vec<Token>| f.iter().filter(|t| matches!(t, Token::Atom { heavy: true, .. })).count();
    let mut best = 0;
    for (idx, frag) in fragments.iter().enumerate() {
        if heavy(frag) > heavy(&fragments[best]) {
            best = idx;
        }
    }
    fragments.into_iter().nth(best).unwrap_or_default()
}
