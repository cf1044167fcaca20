//! html5ever serialization for arena nodes.

use std::io;

use html5ever::QualName;
use html5ever::serialize::{Serialize, Serializer, TraversalScope};

use super::arena::{ArenaDom, ArenaNodeData, ArenaNodeId};

/// A node of an [`ArenaDom`] that html5ever can serialize.
pub struct SerializableNode<'a> {
    pub dom: &'a ArenaDom,
    pub id: ArenaNodeId,
}

enum SerializeOp {
    Open(ArenaNodeId),
    Close(QualName),
}

impl Serialize for SerializableNode<'_> {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        let mut ops = match traversal_scope {
            TraversalScope::IncludeNode => vec![SerializeOp::Open(self.id)],
            TraversalScope::ChildrenOnly(_) => self.reversed_children(self.id),
        };

        while let Some(op) = ops.pop() {
            match op {
                SerializeOp::Open(id) => {
                    let Some(node) = self.dom.get(id) else {
                        continue;
                    };
                    match &node.data {
                        ArenaNodeData::Element { name, attrs } => {
                            serializer.start_elem(
                                name.clone(),
                                attrs.iter().map(|a| (&a.name, a.value.as_str())),
                            )?;
                            ops.push(SerializeOp::Close(name.clone()));
                            ops.extend(self.reversed_children(id));
                        }
                        ArenaNodeData::Document => ops.extend(self.reversed_children(id)),
                        ArenaNodeData::Text(text) => serializer.write_text(text)?,
                        ArenaNodeData::Comment(text) => serializer.write_comment(text)?,
                        ArenaNodeData::Doctype {
                            name,
                            public_id,
                            system_id,
                        } => serializer.write_doctype(&doctype_declaration(name, public_id, system_id))?,
                    }
                }
                SerializeOp::Close(name) => serializer.end_elem(name)?,
            }
        }

        Ok(())
    }
}

/// Everything between `<!DOCTYPE ` and `>`, keeping public and system ids.
fn doctype_declaration(name: &str, public_id: &str, system_id: &str) -> String {
    match (public_id.is_empty(), system_id.is_empty()) {
        (true, true) => name.to_string(),
        (false, true) => format!(r#"{name} PUBLIC "{public_id}""#),
        (false, false) => format!(r#"{name} PUBLIC "{public_id}" "{system_id}""#),
        (true, false) => format!(r#"{name} SYSTEM "{system_id}""#),
    }
}

impl SerializableNode<'_> {
    fn reversed_children(&self, id: ArenaNodeId) -> Vec<SerializeOp> {
        let mut children: Vec<_> = self.dom.children(id).map(SerializeOp::Open).collect();
        children.reverse();
        children
    }
}
