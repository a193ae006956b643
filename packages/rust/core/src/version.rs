//! Version selection and checkout.

use std::path::Path;

use tracing::{info, instrument};

use threejs_docset_shared::{DocsetError, Result, VersionRequest, VersionTag};

use crate::tools::SourceTools;

/// Pick the tag with the greatest [`VersionTag::sort_key`].
///
/// Ties go to the last tag in `tags`, so among tags that all sort as 0 the
/// result depends only on listing order.
pub fn latest_tag(tags: &[String]) -> Option<VersionTag> {
    tags.iter()
        .filter(|tag| !tag.is_empty())
        .map(|tag| VersionTag(tag.clone()))
        .max_by_key(VersionTag::sort_key)
}

/// Turn the request into a concrete tag, listing tags only for `latest`.
pub fn resolve_version(
    tools: &dyn SourceTools,
    repo: &Path,
    request: &VersionRequest,
) -> Result<VersionTag> {
    match request {
        VersionRequest::Exact(tag) => Ok(tag.clone()),
        VersionRequest::Latest => {
            let tags = tools.list_tags(repo)?;
            latest_tag(&tags).ok_or_else(|| {
                DocsetError::validation(format!(
                    "no tags found in {} to resolve 'latest'",
                    repo.display()
                ))
            })
        }
    }
}

/// Resolve the requested version and check it out.
#[instrument(skip(tools), fields(repo = %repo.display(), request = %request))]
pub fn checkout_version(
    tools: &dyn SourceTools,
    repo: &Path,
    request: &VersionRequest,
) -> Result<VersionTag> {
    let tag = resolve_version(tools, repo, request)?;
    info!(%tag, "resolved version");
    tools.checkout(repo, &tag)?;
    Ok(tag)
}
