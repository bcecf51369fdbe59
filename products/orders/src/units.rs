//! Unit field synchronization.
//!
//! Options carry the normalized `unit_id` reference plus the legacy free-text
//! `unit_label`. Whichever side is missing is filled from the other before an
//! option is persisted.

use async_trait::async_trait;
use entity::unit_of_measure;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use tracing::warn;

use crate::draft::OptionDraft;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitRef {
    pub id: i32,
    pub short_name: String,
}

impl From<unit_of_measure::Model> for UnitRef {
    fn from(model: unit_of_measure::Model) -> Self {
        Self {
            id: model.id,
            short_name: model.short_name,
        }
    }
}

#[async_trait]
pub trait UnitLookup: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<UnitRef>, DbErr>;
    async fn find_by_short_name(&self, short_name: &str) -> Result<Option<UnitRef>, DbErr>;
}

/// [`UnitLookup`] over the `units_of_measure` table. Works with a pool or an
/// open transaction.
pub struct UnitDirectory<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> UnitDirectory<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<C: ConnectionTrait> UnitLookup for UnitDirectory<'_, C> {
    async fn find_by_id(&self, id: i32) -> Result<Option<UnitRef>, DbErr> {
        let unit = unit_of_measure::Entity::find_by_id(id).one(self.conn).await?;
        Ok(unit.map(UnitRef::from))
    }

    async fn find_by_short_name(&self, short_name: &str) -> Result<Option<UnitRef>, DbErr> {
        let unit = unit_of_measure::Entity::find()
            .filter(unit_of_measure::Column::ShortName.eq(short_name))
            .one(self.conn)
            .await?;
        Ok(unit.map(UnitRef::from))
    }
}

/// Fills the empty side of the `unit_id` / `unit_label` pair. Never fails:
/// an unresolvable reference is logged and the option is written without it.
/// An unknown `unit_id` is dropped so the foreign key cannot reject the write.
pub async fn sync_unit_fields<L>(lookup: &L, mut option: OptionDraft) -> OptionDraft
where
    L: UnitLookup + ?Sized,
{
    let label = option
        .unit_label
        .as_deref()
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string);

    match (option.unit_id, label) {
        (Some(unit_id), None) => {
            option.unit_label = None;
            match lookup.find_by_id(unit_id).await {
                Ok(Some(unit)) => option.unit_label = Some(unit.short_name),
                Ok(None) => {
                    warn!(unit_id, "unknown unit id; option stored without unit");
                    option.unit_id = None;
                }
                Err(err) => {
                    warn!(unit_id, error = %err, "unit lookup failed; label left empty");
                }
            }
        }
        (None, Some(label)) => match lookup.find_by_short_name(&label).await {
            Ok(Some(unit)) => {
                option.unit_id = Some(unit.id);
                option.unit_label = Some(label);
            }
            Ok(None) => {
                warn!(unit_label = %label, "no unit matches label; keeping free text only");
                option.unit_label = Some(label);
            }
            Err(err) => {
                warn!(unit_label = %label, error = %err, "unit lookup failed; unit id left empty");
                option.unit_label = Some(label);
            }
        },
        (Some(_), Some(label)) => option.unit_label = Some(label),
        (None, None) => option.unit_label = None,
    }
    option
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    struct StaticUnits(HashMap<i32, &'static str>);

    impl StaticUnits {
        fn standard() -> Self {
            Self(HashMap::from([(1, "words"), (2, "chars"), (3, "pcs")]))
        }
    }

    #[async_trait]
    impl UnitLookup for StaticUnits {
        async fn find_by_id(&self, id: i32) -> Result<Option<UnitRef>, DbErr> {
            Ok(self.0.get(&id).map(|name| UnitRef {
                id,
                short_name: name.to_string(),
            }))
        }

        async fn find_by_short_name(&self, short_name: &str) -> Result<Option<UnitRef>, DbErr> {
            Ok(self
                .0
                .iter()
                .find(|(_, name)| **name == short_name)
                .map(|(id, name)| UnitRef {
                    id: *id,
                    short_name: name.to_string(),
                }))
        }
    }

    struct BrokenUnits;

    #[async_trait]
    impl UnitLookup for BrokenUnits {
        async fn find_by_id(&self, _id: i32) -> Result<Option<UnitRef>, DbErr> {
            Err(DbErr::Custom("connection reset".into()))
        }

        async fn find_by_short_name(&self, _short_name: &str) -> Result<Option<UnitRef>, DbErr> {
            Err(DbErr::Custom("connection reset".into()))
        }
    }

    fn option(unit_id: Option<i32>, unit_label: Option<&str>) -> OptionDraft {
        OptionDraft {
            unit_id,
            unit_label: unit_label.map(str::to_string),
            ..OptionDraft::named("Printing")
        }
    }

    #[tokio::test]
    async fn label_is_filled_from_unit_id() {
        let synced = sync_unit_fields(&StaticUnits::standard(), option(Some(3), None)).await;
        assert_eq!(synced.unit_id, Some(3));
        assert_eq!(synced.unit_label.as_deref(), Some("pcs"));
    }

    #[tokio::test]
    async fn blank_label_counts_as_empty() {
        let synced = sync_unit_fields(&StaticUnits::standard(), option(Some(1), Some("  "))).await;
        assert_eq!(synced.unit_label.as_deref(), Some("words"));
    }

    #[tokio::test]
    async fn unit_id_is_filled_from_label() {
        let synced = sync_unit_fields(&StaticUnits::standard(), option(None, Some("pcs"))).await;
        assert_eq!(synced.unit_id, Some(3));
        assert_eq!(synced.unit_label.as_deref(), Some("pcs"));
    }

    #[tokio::test]
    async fn unmatched_label_is_kept_without_reference() {
        let synced = sync_unit_fields(&StaticUnits::standard(), option(None, Some("reels"))).await;
        assert_eq!(synced.unit_id, None);
        assert_eq!(synced.unit_label.as_deref(), Some("reels"));
    }

    #[tokio::test]
    async fn unknown_unit_id_is_dropped() {
        let synced = sync_unit_fields(&StaticUnits::standard(), option(Some(99), None)).await;
        assert_eq!(synced.unit_id, None);
        assert_eq!(synced.unit_label, None);
    }

    #[tokio::test]
    async fn both_fields_set_are_left_alone() {
        let synced = sync_unit_fields(&StaticUnits::standard(), option(Some(1), Some("pcs"))).await;
        assert_eq!(synced.unit_id, Some(1));
        assert_eq!(synced.unit_label.as_deref(), Some("pcs"));
    }

    #[tokio::test]
    async fn lookup_failures_do_not_fail_the_write() {
        let synced = sync_unit_fields(&BrokenUnits, option(Some(3), None)).await;
        assert_eq!(synced.unit_id, Some(3));
        assert_eq!(synced.unit_label, None);

        let synced = sync_unit_fields(&BrokenUnits, option(None, Some("pcs"))).await;
        assert_eq!(synced.unit_id, None);
        assert_eq!(synced.unit_label.as_deref(), Some("pcs"));
    }
}
