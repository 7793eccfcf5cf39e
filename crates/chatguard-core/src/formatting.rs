//! Telegram HTML helpers.

use crate::domain::UserRef;

/// Escape HTML special characters for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Clickable mention of a user.
pub fn mention_html(user: &UserRef) -> String {
    format!(
        "<a href='tg://user?id={}'>{}</a>",
        user.id.0,
        escape_html(&user.display_name)
    )
}

/// Bold failure line used for every error reply.
pub fn error_html(text: &str) -> String {
    format!("<b>❌ {}</b>", escape_html(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_basic_html() {
        assert_eq!(escape_html("<b>&\"</b>"), "&lt;b&gt;&amp;&quot;&lt;/b&gt;");
    }

    #[test]
    fn mention_escapes_display_name() {
        let user = UserRef::new(7, "<Eve>");
        assert_eq!(
            mention_html(&user),
            "<a href='tg://user?id=7'>&lt;Eve&gt;</a>"
        );
    }

    #[test]
    fn error_lines_are_bold_and_marked() {
        assert_eq!(error_html("nope"), "<b>❌ nope</b>");
    }
}
