// Typed query parameters for the paginated user list.
//
// One encoder for the whole surface: `ListParams` serializes through
// serde into the query string, so the wire names live in exactly one place.

use serde::Serialize;

/// Sort direction as the backend spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortOrder {
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

impl SortOrder {
    /// The opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Sortable column of the user list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    FirstName,
    LastName,
    Email,
    Status,
    CreatedAt,
}

impl SortKey {
    /// All sortable columns, in table order.
    pub const ALL: [SortKey; 5] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Status,
        Self::CreatedAt,
    ];
}

/// Query parameters for `GET /users`.
///
/// `page` is zero-based on the wire; the view layer shows pages one-based
/// and owns the translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub limit: u32,
    pub page: u32,
    pub sort_key: SortKey,
    pub sort_order: SortOrder,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            limit: 10,
            page: 0,
            sort_key: SortKey::CreatedAt,
            sort_order: SortOrder::Desc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_the_backend_contract() {
        let params = ListParams::default();
        assert_eq!(params.limit, 10);
        assert_eq!(params.page, 0);
        assert_eq!(params.sort_key, SortKey::CreatedAt);
        assert_eq!(params.sort_order, SortOrder::Desc);
    }

    #[test]
    fn wire_names_are_camel_case() {
        let value = serde_json::to_value(ListParams::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "limit": 10,
                "page": 0,
                "sortKey": "createdAt",
                "sortOrder": "DESC",
            })
        );
    }

    #[test]
    fn sort_order_spells_both_directions() {
        assert_eq!(serde_json::to_value(SortOrder::Asc).unwrap(), json!("ASC"));
        assert_eq!(serde_json::to_value(SortOrder::Desc).unwrap(), json!("DESC"));
        assert_eq!(SortOrder::Asc.toggled(), SortOrder::Desc);
    }

    #[test]
    fn sort_keys_use_field_names() {
        for (key, expected) in [
            (SortKey::FirstName, "firstName"),
            (SortKey::LastName, "lastName"),
            (SortKey::Email, "email"),
            (SortKey::Status, "status"),
            (SortKey::CreatedAt, "createdAt"),
        ] {
            assert_eq!(serde_json::to_value(key).unwrap(), json!(expected));
        }
    }
}
