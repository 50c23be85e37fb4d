//! Permission tag rendering — the `code` of each assigned edge, or a red
//! "None" when the user holds no permissions.

use ratatui::text::{Line, Span};

use userdeck_api::UserPermission;

use crate::theme;

/// Render a user's permission edges as a single line of tags.
pub fn tags_line(edges: &[UserPermission]) -> Line<'static> {
    if edges.is_empty() {
        return Line::from(Span::styled("None", theme::tag_none()));
    }

    let mut spans = Vec::with_capacity(edges.len() * 2);
    for (i, edge) in edges.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(edge.permission.code.clone(), theme::tag()));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use userdeck_api::Permission;

    fn edge(code: &str) -> UserPermission {
        UserPermission {
            id: format!("e-{code}"),
            user_id: "u1".into(),
            permission_id: code.to_lowercase(),
            permission: Permission {
                id: code.to_lowercase(),
                code: code.into(),
                description: String::new(),
            },
        }
    }

    #[test]
    fn empty_edges_render_none() {
        let line = tags_line(&[]);
        assert_eq!(line.spans.len(), 1);
        assert_eq!(line.spans[0].content, "None");
    }

    #[test]
    fn codes_are_space_separated() {
        let line = tags_line(&[edge("USERS_READ"), edge("USERS_WRITE")]);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "USERS_READ USERS_WRITE");
    }
}
