//! Optimistic update transactions.

/// Records addressable by a stable id.
pub trait Identified {
    fn key(&self) -> &str;
}

impl Identified for crate::models::Application {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Identified for crate::models::Pet {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Identified for crate::models::Campaign {
    fn key(&self) -> &str {
        &self.id
    }
}

/// A local change applied ahead of server confirmation.
///
/// `rollback` restores the prior snapshot only while the record still holds
/// the optimistic value, so a refetch that landed in between is not clobbered.
#[derive(Debug)]
#[must_use = "an optimistic change must be committed or rolled back"]
pub struct Optimistic<T> {
    id: String,
    prior: T,
    applied: T,
}

impl<T: Identified + Clone + PartialEq> Optimistic<T> {
    /// Apply `mutate` to the record with `id`. `None` when no such record is held.
    pub fn apply<F>(items: &mut [T], id: &str, mutate: F) -> Option<Self>
    where
        F: FnOnce(&mut T),
    {
        let item = items.iter_mut().find(|item| item.key() == id)?;
        let prior = item.clone();
        mutate(item);
        Some(Self {
            id: id.to_string(),
            prior,
            applied: item.clone(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Keep the change.
    pub fn commit(self) {}

    /// Restore the prior snapshot. Returns whether anything was restored.
    pub fn rollback(self, items: &mut [T]) -> bool {
        match items.iter_mut().find(|item| item.key() == self.id) {
            Some(item) if *item == self.applied => {
                *item = self.prior;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: String,
        value: u32,
    }

    impl Identified for Row {
        fn key(&self) -> &str {
            &self.id
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                id: "a".into(),
                value: 1,
            },
            Row {
                id: "b".into(),
                value: 2,
            },
        ]
    }

    #[test]
    fn test_apply_then_rollback_restores_prior() {
        let mut items = rows();
        let txn = Optimistic::apply(&mut items, "b", |r| r.value = 9).unwrap();
        assert_eq!(items[1].value, 9);
        assert!(txn.rollback(&mut items));
        assert_eq!(items, rows());
    }

    #[test]
    fn test_commit_keeps_change() {
        let mut items = rows();
        Optimistic::apply(&mut items, "a", |r| r.value = 5)
            .unwrap()
            .commit();
        assert_eq!(items[0].value, 5);
    }

    #[test]
    fn test_apply_missing_record_is_none() {
        let mut items = rows();
        assert!(Optimistic::apply(&mut items, "zzz", |r| r.value = 0).is_none());
    }

    #[test]
    fn test_rollback_skips_records_replaced_meanwhile() {
        let mut items = rows();
        let txn = Optimistic::apply(&mut items, "a", |r| r.value = 7).unwrap();
        items[0].value = 42;
        assert!(!txn.rollback(&mut items));
        assert_eq!(items[0].value, 42);
    }
}
