use serde::{Deserialize, Serialize};

use super::{deep_clone, PlainValue};
use crate::error::MalformedInputError;

const ID_KEY: &str = "id";

/// A record paired with its 1-based display position. The id is positional and
/// must be recomputed whenever the list order or membership changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identified<T> {
    #[serde(flatten)]
    pub item: T,
    pub id: u32,
}

/// Clones `records` and stamps each mapping with `id = index + 1`.
pub fn set_id(records: &[PlainValue]) -> Result<Vec<PlainValue>, MalformedInputError> {
    let mut out = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let PlainValue::Mapping(mut map) = deep_clone(record)? else {
            return Err(MalformedInputError::NotAMapping { index });
        };
        map.insert(ID_KEY.to_owned(), PlainValue::from(index as u64 + 1));
        out.push(PlainValue::Mapping(map));
    }
    Ok(out)
}

pub fn with_ids<T: Clone>(items: &[T]) -> Vec<Identified<T>> {
    items
        .iter()
        .zip(1u32..)
        .map(|(item, id)| Identified {
            item: item.clone(),
            id,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    use crate::records::Member;

    fn members() -> Vec<PlainValue> {
        vec![
            PlainValue::from(json!({"name": "Ada", "head": "/img/a.png", "status": [1]})),
            PlainValue::from(json!({"name": "Lin", "head": "/img/b.png", "status": []})),
            PlainValue::from(json!({"id": 99, "name": "Kai", "head": "/img/c.png"})),
        ]
    }

    #[test]
    fn ids_follow_position_without_touching_input() {
        let input = members();
        let snapshot = input.clone();

        let stamped = set_id(&input).expect("set ids");
        assert_eq!(input, snapshot);
        for (i, record) in stamped.iter().enumerate() {
            assert_eq!(record.get("id").and_then(PlainValue::as_u64), Some(i as u64 + 1));
        }
        assert_eq!(stamped[0].get("name").and_then(PlainValue::as_str), Some("Ada"));
    }

    #[test]
    fn existing_id_is_overwritten_in_place() {
        let stamped = set_id(&members()).expect("set ids");
        let keys: Vec<_> = stamped[2].as_mapping().expect("mapping").keys().cloned().collect();
        assert_eq!(keys, vec!["id", "name", "head"]);
        assert_eq!(stamped[2].get("id").and_then(PlainValue::as_u64), Some(3));
    }

    #[test]
    fn repeated_calls_are_equal_but_fresh() {
        let input = members();
        let mut first = set_id(&input).expect("first");
        let second = set_id(&input).expect("second");
        assert_eq!(first, second);

        if let PlainValue::Mapping(map) = &mut first[0] {
            map.insert("name".into(), "changed".into());
        }
        assert_ne!(first, second);
        assert_eq!(second[0].get("name").and_then(PlainValue::as_str), Some("Ada"));
    }

    #[test]
    fn non_mapping_elements_are_malformed() {
        let input = vec![PlainValue::from(json!({"name": "ok"})), PlainValue::from(7u64)];
        assert_matches!(
            set_id(&input),
            Err(MalformedInputError::NotAMapping { index: 1 })
        );
    }

    #[test]
    fn empty_list_yields_empty_list() {
        assert!(set_id(&[]).expect("empty").is_empty());
        assert!(with_ids::<Member>(&[]).is_empty());
    }

    #[test]
    fn typed_records_serialize_flat() {
        let members = vec![Member {
            record_id: None,
            name: "Ada".into(),
            head: "/img/a.png".into(),
            status: vec![1, 2],
        }];
        let identified = with_ids(&members);
        assert_eq!(identified[0].id, 1);
        assert_eq!(
            serde_json::to_value(&identified).expect("serialize"),
            json!([{"name": "Ada", "head": "/img/a.png", "status": [1, 2], "id": 1}])
        );
    }
}
