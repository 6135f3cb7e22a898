use lnac_library::LibraryIndex;
use lnac_types::{
    ClassificationResult, InferenceRequest, InferenceResponse, LevelPolicy,
    DEFAULT_LIBRARY_VERSION,
};

/// Maps a request onto the library: the resolved level picks the candidate
/// list, and its first entry becomes the derailer.
///
/// Only `user.assessed_level` is consulted; `context`, `interaction` and
/// `history_summary` do not influence the result.
pub fn classify(
    request: &InferenceRequest,
    index: &LibraryIndex,
    policy: LevelPolicy,
) -> ClassificationResult {
    let resolved = request.assessed_level();
    let level = policy.report(request.raw_assessed_level(), resolved);
    ClassificationResult::new(level, index.primary_derailer(resolved))
}

pub fn respond(
    request: &InferenceRequest,
    index: &LibraryIndex,
    policy: LevelPolicy,
) -> InferenceResponse {
    let classification = classify(request, index, policy);
    let library_version = index.version().unwrap_or(DEFAULT_LIBRARY_VERSION);
    InferenceResponse::assemble(classification, library_version)
}
