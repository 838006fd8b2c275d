use crate::domain::{ArticleMetadata, SeriesInfo};
use crate::error::Result;
use crate::index::ArticleIndex;

/// Series navigation for `slug`, or `None` when the article is not part of
/// a series.
///
/// Members are ordered by `seriesOrder`; members sharing an order, or lacking
/// one, keep index order after the stable sort. An order of 0 counts as
/// missing.
pub fn series_info(index: &ArticleIndex, slug: &str) -> Result<Option<SeriesInfo>> {
    let current = &index.get(slug)?.metadata;
    let (Some(series_name), Some(current_part)) = (&current.series, part_number(current)) else {
        return Ok(None);
    };

    let mut members: Vec<&ArticleMetadata> = index
        .all()
        .iter()
        .map(|article| &article.metadata)
        .filter(|metadata| metadata.series.as_ref() == Some(series_name))
        .collect();
    members.sort_by_key(|metadata| part_number(metadata).unwrap_or(u32::MAX));

    // The current article is always a member; fall back to the first slot
    // rather than panicking.
    let position = members
        .iter()
        .position(|metadata| metadata.slug == current.slug)
        .unwrap_or(0);

    let previous_article = position
        .checked_sub(1)
        .and_then(|i| members.get(i))
        .map(|metadata| (*metadata).clone());
    let next_article = members.get(position + 1).map(|metadata| (*metadata).clone());

    Ok(Some(SeriesInfo {
        series_name: series_name.clone(),
        current_part,
        total_parts: members.len(),
        previous_article,
        next_article,
        all_articles: members.into_iter().cloned().collect(),
    }))
}

fn part_number(metadata: &ArticleMetadata) -> Option<u32> {
    metadata.series_order.filter(|&order| order > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Article;
    use crate::index::tests::article;

    fn part(slug: &str, date: &str, series: &str, order: u32) -> Article {
        let mut article = article(slug, date, "Series", &[]);
        article.metadata.series = Some(series.to_string());
        article.metadata.series_order = Some(order);
        article
    }

    fn slug(metadata: &Option<ArticleMetadata>) -> Option<&str> {
        metadata.as_ref().map(|m| m.slug.as_str())
    }

    fn index() -> ArticleIndex {
        ArticleIndex::from_articles(vec![
            part("part-3", "2024-01-01", "Async", 3),
            part("part-1", "2024-03-01", "Async", 1),
            part("other", "2024-02-15", "Closures", 1),
            part("part-2", "2024-02-01", "Async", 2),
            article("loose", "2024-04-01", "Misc", &[]),
        ])
        .unwrap()
    }

    #[test]
    fn middle_part_has_both_neighbours() {
        let info = series_info(&index(), "part-2").unwrap().unwrap();
        assert_eq!(info.series_name, "Async");
        assert_eq!(info.current_part, 2);
        assert_eq!(info.total_parts, 3);
        assert_eq!(slug(&info.previous_article), Some("part-1"));
        assert_eq!(slug(&info.next_article), Some("part-3"));
        let all: Vec<&str> = info.all_articles.iter().map(|m| m.slug.as_str()).collect();
        assert_eq!(all, vec!["part-1", "part-2", "part-3"]);
    }

    #[test]
    fn boundaries_have_one_neighbour() {
        let index = index();
        let first = series_info(&index, "part-1").unwrap().unwrap();
        assert_eq!(slug(&first.previous_article), None);
        assert_eq!(slug(&first.next_article), Some("part-2"));

        let last = series_info(&index, "part-3").unwrap().unwrap();
        assert_eq!(slug(&last.previous_article), Some("part-2"));
        assert_eq!(slug(&last.next_article), None);
    }

    #[test]
    fn article_outside_a_series_has_no_info() {
        assert!(series_info(&index(), "loose").unwrap().is_none());
    }

    #[test]
    fn series_without_order_has_no_info() {
        let mut unordered = article("unordered", "2024-01-01", "X", &[]);
        unordered.metadata.series = Some("Async".to_string());
        let index = ArticleIndex::from_articles(vec![unordered]).unwrap();
        assert!(series_info(&index, "unordered").unwrap().is_none());
    }

    #[test]
    fn order_zero_is_not_a_series_part() {
        let index = ArticleIndex::from_articles(vec![
            part("intro", "2024-01-01", "Async", 0),
            part("part-1", "2024-01-02", "Async", 1),
            part("part-2", "2024-01-03", "Async", 2),
        ])
        .unwrap();
        assert!(series_info(&index, "intro").unwrap().is_none());

        let info = series_info(&index, "part-1").unwrap().unwrap();
        let all: Vec<&str> = info.all_articles.iter().map(|m| m.slug.as_str()).collect();
        assert_eq!(all, vec!["part-1", "part-2", "intro"]);
        assert_eq!(slug(&info.previous_article), None);
    }

    #[test]
    fn duplicated_and_skipped_orders_do_not_panic() {
        let index = ArticleIndex::from_articles(vec![
            part("a", "2024-01-03", "Gaps", 5),
            part("b", "2024-01-02", "Gaps", 1),
            part("c", "2024-01-01", "Gaps", 5),
        ])
        .unwrap();
        let info = series_info(&index, "c").unwrap().unwrap();
        let all: Vec<&str> = info.all_articles.iter().map(|m| m.slug.as_str()).collect();
        assert_eq!(all, vec!["b", "a", "c"]);
        assert_eq!(slug(&info.previous_article), Some("a"));
        assert_eq!(slug(&info.next_article), None);
        assert_eq!(info.total_parts, 3);
    }
}
