//! Member anchor rewriting for API reference pages.
//!
//! The three.js page generator expands `[method:Type name](args)` markup in
//! the browser. Inside a docset the expansion has to exist in the file, with
//! a `dashAnchor` so the viewer can build a table of contents.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// `[kind:ReturnType name]` with an optional trailing `(signature)`.
///
/// Groups: 1 kind, 2 return type, 3 name, 4 signature.
static MEMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(member|property|method):(\w+)? ([\w.\s]+)\]\s*(\(.*\))?").expect("member regex")
});

/// Any opener that looks like member markup, matched or not.
static CANDIDATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(?:member|property|method):").expect("candidate regex")
});

/// Result of rewriting one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorRewrite {
    pub html: String,
    /// Member blocks replaced.
    pub replaced: usize,
    /// Openers left in place because the full pattern did not match.
    pub unmatched: usize,
}

/// Rewrite every member block in `html`. `page_name` is the file stem.
pub fn rewrite_anchors(page_name: &str, html: &str) -> AnchorRewrite {
    let mut replaced = 0;

    let rewritten = MEMBER_RE
        .replace_all(html, |caps: &Captures| {
            replaced += 1;
            render_member(page_name, caps)
        })
        .into_owned();

    let unmatched = CANDIDATE_RE.find_iter(&rewritten).count();

    AnchorRewrite {
        html: rewritten,
        replaced,
        unmatched,
    }
}

fn render_member(page_name: &str, caps: &Captures) -> String {
    let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());

    let kind = upper_first(group(1));
    let return_type = group(2);
    let name = group(3);
    let signature = group(4);
    let target = format!("{page_name}.{name}");

    format!(
        "<a onclick=\"window.parent.setUrlFragment('{target}')\" target=\"_parent\" title=\"{target}\" class=\"permalink\">#</a> \
         .<a onclick=\"window.parent.setUrlFragment('{target}')\" id=\"{name}\">{name}</a> {signature} : \
         <a name=\"//apple_ref/cpp/{kind}/{name}\" class=\"param dashAnchor\" onclick=\"window.parent.setUrlFragment('{return_type}')\">{return_type}</a>"
    )
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
