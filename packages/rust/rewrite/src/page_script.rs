//! Patches for the documentation's shared `page.js` helper.
//!
//! Each pass is a literal `&str -> String` substitution applied in sequence.
//! The docset viewer has no single-page-app router, so the passes remove
//! the script's assumptions about the hosted site's URL layout.

/// A single literal substitution.
pub(crate) struct ScriptPass {
    pub name: &'static str,
    pub from: &'static str,
    pub to: &'static str,
}

/// The passes, in application order.
pub(crate) const PASSES: [ScriptPass; 3] = [
    // Pass 1: prettify is loaded relative to the page, not the site root.
    ScriptPass {
        name: "prettify-path",
        from: "pathname.substring( 0, pathname.indexOf( 'docs' ) + 4 ) + '/prettify",
        to: "'prettify",
    },
    // Pass 2: example deep links point at the example file itself.
    ScriptPass {
        name: "example-links",
        from: "../examples/#$1",
        to: "../examples/$1.html",
    },
    // Pass 3: the redirect has no matching route and breaks the viewer.
    ScriptPass {
        name: "location-replace",
        from: "window.location.replace(",
        to: "// window.location.replace(",
    },
];

/// Outcome of patching one script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptPatch {
    /// The patched source.
    pub script: String,
    /// Names of passes that found nothing to replace.
    pub missed: Vec<&'static str>,
}

/// Run every pass over `script`.
pub(crate) fn run_passes(script: &str) -> ScriptPatch {
    let mut result = script.to_string();
    let mut missed = Vec::new();

    for pass in &PASSES {
        if result.contains(pass.from) {
            result = result.replace(pass.from, pass.to);
        } else {
            missed.push(pass.name);
        }
    }

    ScriptPatch {
        script: result,
        missed,
    }
}
