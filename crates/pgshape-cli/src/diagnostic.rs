//! Renders a query error the way `psql` does: the message, the offending
//! line, and a caret under the cursor position.

use pgshape_core::QueryError;

/// Formats `error` against the query text it was raised for.
///
/// Errors without a position render as the message alone.
#[must_use]
pub fn render(query: &str, error: &QueryError) -> String {
    let mut out = format!("ERROR:  {}\n", error.message);
    if error.cursorpos == QueryError::NO_POSITION {
        return out;
    }

    // 0-based character index; may sit one past the last character
    let target = error.cursorpos - 1;
    let mut line_no = 1;
    let mut line_start = 0;
    for (i, c) in query.chars().enumerate().take(target) {
        if c == '\n' {
            line_no += 1;
            line_start = i + 1;
        }
    }

    let line: String = query
        .chars()
        .skip(line_start)
        .take_while(|c| *c != '\n')
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect();
    let prefix = format!("LINE {line_no}: ");
    let column = target - line_start;

    out.push_str(&prefix);
    out.push_str(line.trim_end());
    out.push('\n');
    out.push_str(&" ".repeat(prefix.len() + column));
    out.push_str("^\n");
    out
}
