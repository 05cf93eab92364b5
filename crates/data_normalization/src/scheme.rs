/// Plan-type markers removed from lower-cased scheme names, longest first so that
/// `- growth plan` is not left as ` plan` by the shorter `- growth`.
const PLAN_MARKERS: [&str; 4] = ["- regular -", "- direct -", "- growth plan", "- growth"];

/// Canonical scheme name used as the cross-folio join key.
///
/// Lower-cases, removes plan-type markers by exact substring match, drops every
/// parenthesized segment (e.g. `(erstwhile ...)`), and collapses whitespace. The steps
/// repeat until the name stops changing, which makes the function idempotent.
pub fn normalize(scheme_name: &str) -> String {
    let mut current = normalize_pass(scheme_name);
    // Every pass after the first either shortens the name or leaves it unchanged.
    loop {
        let next = normalize_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_pass(name: &str) -> String {
    let mut out = collapse_whitespace(&name.to_lowercase());
    for marker in PLAN_MARKERS {
        out = out.replace(marker, " ");
    }
    collapse_whitespace(&strip_parenthesized(&out))
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Replaces balanced `( ... )` segments (nesting included) with a space.
/// An unclosed `(` is kept verbatim.
fn strip_parenthesized(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending = String::new();
    let mut depth = 0usize;

    for c in s.chars() {
        match c {
            '(' => {
                depth += 1;
                pending.push(c);
            }
            ')' if depth > 0 => {
                depth -= 1;
                pending.push(c);
                if depth == 0 {
                    pending.clear();
                    out.push(' ');
                }
            }
            _ if depth > 0 => pending.push(c),
            _ => out.push(c),
        }
    }

    out.push_str(&pending);
    out
}
