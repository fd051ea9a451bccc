//! Expansión generación a generación.
//!
//! Todos los nodos de la generación `g` se expanden (en paralelo) antes de
//! empezar la `g + 1`. Un fallo del backend en un nodo deja ese nodo sin
//! hijos y la rama termina ahí; el resto del árbol sigue. No se suprimen
//! ciclos: una estructura igual a un ancestro se vuelve a expandir, y sólo
//! `generation_limit` acota la profundidad.
use chem_adapters::{MetabolizerAdapter, Transport};
use chem_domain::{normalize, CanonicalStructure};
use futures_util::future::join_all;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::tree::{NodeId, TransformationTree};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpansionRequest {
    pub structure: String,
    #[serde(rename = "generationLimit")]
    pub generation_limit: u32,
    #[serde(rename = "transformationLibraries", default)]
    pub transformation_libraries: Vec<String>,
}

pub struct Expander<'a> {
    adapter: &'a MetabolizerAdapter,
    transport: &'a dyn Transport,
}

impl<'a> Expander<'a> {
    pub fn new(adapter: &'a MetabolizerAdapter, transport: &'a dyn Transport) -> Self {
        Self { adapter, transport }
    }

    pub async fn expand(&self, root: &CanonicalStructure, generation_limit: u32, libraries: &[String]) -> TransformationTree {
        let mut tree = TransformationTree::new(root.as_str());
        let mut frontier: Vec<NodeId> = vec![0];

        for generation in 0..generation_limit {
            if frontier.is_empty() {
                break;
            }
            let calls = frontier.iter().map(|&id| {
                                           let structure = tree.nodes()[id].structure.clone();
                                           async move { self.products(&structure, libraries).await }
                                       });
            let products = join_all(calls).await;

            let mut next = Vec::new();
            for (parent, children) in frontier.iter().copied().zip(products) {
                for child in children {
                    if let Some(id) = tree.add_child(parent, child) {
                        next.push(id);
                    }
                }
            }
            debug!("expand: generation {} produced {} nodes", generation + 1, next.len());
            frontier = next;
        }
        tree
    }

    /// Productos normalizados de un nodo; vacío si el backend falla.
    async fn products(&self, structure: &str, libraries: &[String]) -> Vec<String> {
        let raw = match self.adapter.transform(self.transport, structure, libraries).await {
            Ok(children) => children,
            Err(e) => {
                warn!("expand: {structure} not expanded: {e}");
                return Vec::new();
            }
        };
        raw.into_iter()
           .filter_map(|child| match normalize(&child) {
               Ok(s) => Some(s.into_string()),
               Err(e) => {
                   warn!("expand: dropping product {child}: {e}");
                   None
               }
           })
           .collect()
    }
}
