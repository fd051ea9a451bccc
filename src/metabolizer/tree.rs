//! Árbol de transformación en arena: los nodos viven en un `Vec` y se
//! referencian por índice. El padre es sólo una relación (`Option<NodeId>`),
//! nunca propiedad.
use serde::Serialize;

pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq)]
pub struct TransformationNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub structure: String,
    pub generation: u32,
    /// En el orden devuelto por el backend.
    pub children: Vec<NodeId>,
}

/// Registro plano para transporte.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformationRecord {
    pub id: NodeId,
    #[serde(rename = "parentId")]
    pub parent_id: Option<NodeId>,
    pub structure: String,
    pub generation: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransformationTree {
    nodes: Vec<TransformationNode>,
}

impl TransformationTree {
    pub fn new(root_structure: &str) -> Self {
        Self { nodes: vec![TransformationNode { id: 0,
                                                parent: None,
                                                structure: root_structure.to_string(),
                                                generation: 0,
                                                children: Vec::new() }] }
    }

    pub fn root(&self) -> &TransformationNode {
        &self.nodes[0]
    }

    pub fn get(&self, id: NodeId) -> Option<&TransformationNode> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[TransformationNode] {
        &self.nodes
    }

    /// Añade un hijo a `parent` y devuelve su id. `None` si el padre no existe.
    pub fn add_child(&mut self, parent: NodeId, structure: String) -> Option<NodeId> {
        let generation = self.nodes.get(parent)?.generation + 1;
        let id = self.nodes.len();
        self.nodes.push(TransformationNode { id,
                                             parent: Some(parent),
                                             structure,
                                             generation,
                                             children: Vec::new() });
        self.nodes[parent].children.push(id);
        Some(id)
    }

    /// Recorrido en preorden (padre, luego cada hijo en orden).
    pub fn flatten(&self) -> Vec<TransformationRecord> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![0];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            out.push(TransformationRecord { id: node.id,
                                            parent_id: node.parent,
                                            structure: node.structure.clone(),
                                            generation: node.generation });
            stack.extend(node.children.iter().rev());
        }
        out
    }
}
