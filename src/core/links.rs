use crate::core::NodeId;
use crate::core::error::ChainError;
use crate::core::sync_impl::chain::UnhandledPolicy;

/// A node slot in a chain arena.
#[derive(Clone)]
pub(crate) struct Link<T> {
    pub(crate) label: String,
    pub(crate) item: T,
    pub(crate) successor: Option<NodeId>,
}

/// Arena of chain nodes linked by index.
///
/// The arena owns every node; a link only names its successor, so relinking
/// never moves or drops anything.
#[derive(Clone)]
pub(crate) struct Links<T> {
    nodes: Vec<Link<T>>,
}

impl<T> Default for Links<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<T> Links<T> {
    pub(crate) fn push(&mut self, label: String, item: T) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Link {
            label,
            item,
            successor: None,
        });
        id
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn get(&self, id: NodeId) -> Result<&Link<T>, ChainError> {
        self.nodes.get(id.0).ok_or(ChainError::UnknownNode(id))
    }

    pub(crate) fn successor(&self, id: NodeId) -> Result<Option<NodeId>, ChainError> {
        Ok(self.get(id)?.successor)
    }

    /// Points `from` at `to`, or clears the link when `to` is `None`.
    ///
    /// Rejects the change if it would make the chain cyclic; the arena is left
    /// untouched in that case.
    pub(crate) fn set_successor(
        &mut self,
        from: NodeId,
        to: Option<NodeId>,
    ) -> Result<(), ChainError> {
        self.get(from)?;
        if let Some(to) = to {
            self.get(to)?;
            if self.reaches(to, from) {
                return Err(ChainError::Cycle { from, to });
            }
        }

        let link = &mut self.nodes[from.0];
        if let (Some(old), Some(new)) = (link.successor, to) {
            if old != new {
                log::debug!(
                    "Relinking '{}': successor {} replaced by {}",
                    link.label,
                    old,
                    new
                );
            }
        }
        link.successor = to;
        Ok(())
    }

    /// Splices `new` between `node` and its successor, rolling back the
    /// first link if the second is rejected.
    pub(crate) fn insert_after(&mut self, node: NodeId, new: NodeId) -> Result<(), ChainError> {
        let old = self.successor(node)?;
        let previous = self.successor(new)?;
        self.set_successor(new, old)?;
        if let Err(e) = self.set_successor(node, Some(new)) {
            self.set_successor(new, previous)?;
            return Err(e);
        }
        Ok(())
    }

    /// Reports a request that fell off the chain after `last`.
    ///
    /// `Ok` means the caller should hand back its own "unhandled" value.
    pub(crate) fn unhandled(&self, last: NodeId, policy: UnhandledPolicy) -> Result<(), ChainError> {
        let label = &self.get(last)?.label;
        match policy {
            UnhandledPolicy::Report => {
                log::debug!("Request left the chain unhandled after '{}'", label);
                Ok(())
            }
            UnhandledPolicy::Fail => {
                log::warn!("Request left the chain unhandled after '{}'", label);
                Err(ChainError::Unhandled {
                    last,
                    label: label.clone(),
                })
            }
        }
    }

    /// Whether walking successors from `start` ever arrives at `target`.
    fn reaches(&self, start: NodeId, target: NodeId) -> bool {
        let mut current = Some(start);
        let mut steps = 0;
        while let Some(id) = current {
            if id == target {
                return true;
            }
            // Links are acyclic, so a walk longer than the arena means corruption.
            steps += 1;
            if steps > self.nodes.len() {
                return true;
            }
            current = self.nodes.get(id.0).and_then(|l| l.successor);
        }
        false
    }

    /// Node ids reachable from `start`, in traversal order.
    pub(crate) fn path(&self, start: NodeId) -> Result<Vec<NodeId>, ChainError> {
        self.get(start)?;
        let mut path = Vec::new();
        let mut current = Some(start);
        while let Some(id) = current {
            path.push(id);
            current = self.nodes[id.0].successor;
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena(n: usize) -> (Links<()>, Vec<NodeId>) {
        let mut links = Links::default();
        let ids = (0..n).map(|i| links.push(format!("n{}", i), ())).collect();
        (links, ids)
    }

    #[test]
    fn test_links_start_unlinked() {
        let (links, ids) = arena(2);
        assert_eq!(links.successor(ids[0]), Ok(None));
        assert_eq!(links.path(ids[1]).unwrap(), vec![ids[1]]);
    }

    #[test]
    fn test_links_path_follows_successors() {
        let (mut links, ids) = arena(3);
        links.set_successor(ids[0], Some(ids[1])).unwrap();
        links.set_successor(ids[1], Some(ids[2])).unwrap();
        assert_eq!(links.path(ids[0]).unwrap(), ids);
        assert_eq!(links.path(ids[1]).unwrap(), vec![ids[1], ids[2]]);
    }

    #[test]
    fn test_links_reject_cycle() {
        let (mut links, ids) = arena(3);
        links.set_successor(ids[0], Some(ids[1])).unwrap();
        links.set_successor(ids[1], Some(ids[2])).unwrap();

        let err = links.set_successor(ids[2], Some(ids[0])).unwrap_err();
        assert_eq!(
            err,
            ChainError::Cycle {
                from: ids[2],
                to: ids[0]
            }
        );
        assert_eq!(links.successor(ids[2]), Ok(None));

        assert!(links.set_successor(ids[0], Some(ids[0])).is_err());
    }

    #[test]
    fn test_links_unknown_node() {
        let (mut links, ids) = arena(1);
        let ghost = NodeId(7);
        assert_eq!(
            links.set_successor(ids[0], Some(ghost)),
            Err(ChainError::UnknownNode(ghost))
        );
        assert!(links.path(ghost).is_err());
    }

    #[test]
    fn test_links_insert_after_rejects_without_change() {
        let (mut links, ids) = arena(3);
        links.set_successor(ids[0], Some(ids[1])).unwrap();
        links.set_successor(ids[1], Some(ids[2])).unwrap();

        // ids[2] is downstream of ids[0]'s successor.
        assert!(matches!(
            links.insert_after(ids[0], ids[2]),
            Err(ChainError::Cycle { .. })
        ));
        // The second link fails after the first was laid down.
        assert!(matches!(
            links.insert_after(ids[1], ids[1]),
            Err(ChainError::Cycle { .. })
        ));

        assert_eq!(links.path(ids[0]).unwrap(), ids);
    }

    #[test]
    fn test_links_unhandled_policy() {
        let (links, ids) = arena(1);
        assert_eq!(links.unhandled(ids[0], UnhandledPolicy::Report), Ok(()));
        assert_eq!(
            links.unhandled(ids[0], UnhandledPolicy::Fail),
            Err(ChainError::Unhandled {
                last: ids[0],
                label: "n0".to_string()
            })
        );
    }

    #[test]
    fn test_links_clear_successor() {
        let (mut links, ids) = arena(2);
        links.set_successor(ids[0], Some(ids[1])).unwrap();
        links.set_successor(ids[0], None).unwrap();
        assert_eq!(links.successor(ids[0]), Ok(None));
    }
}
