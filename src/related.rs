use crate::domain::ArticleMetadata;
use crate::error::Result;
use crate::index::ArticleIndex;

pub const DEFAULT_RELATED_LIMIT: usize = 3;

const CATEGORY_SCORE: usize = 10;
const SHARED_TAG_SCORE: usize = 5;

/// Articles most similar to `slug`, best first.
///
/// Candidates score 10 for a matching category and 5 per shared tag. Zero
/// scores are dropped; equal scores keep index order (newest first).
pub fn related_to(index: &ArticleIndex, slug: &str, limit: usize) -> Result<Vec<ArticleMetadata>> {
    let current = &index.get(slug)?.metadata;

    let mut scored: Vec<(usize, &ArticleMetadata)> = index
        .all()
        .iter()
        .map(|article| &article.metadata)
        .filter(|candidate| candidate.slug != current.slug)
        .map(|candidate| (score(current, candidate), candidate))
        .filter(|(score, _)| *score > 0)
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    Ok(scored
        .into_iter()
        .take(limit)
        .map(|(_, metadata)| metadata.clone())
        .collect())
}

fn score(current: &ArticleMetadata, candidate: &ArticleMetadata) -> usize {
    let mut score = 0;
    if candidate.category == current.category {
        score += CATEGORY_SCORE;
    }
    score + candidate.shared_tags(current) * SHARED_TAG_SCORE
}
