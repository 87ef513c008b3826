//! The bonsai entity and its durable record shape.

use crate::canvas::Canvas;
use crate::types::{AgeStage, Season, Style};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A generated tree together with the parameters it was grown from.
///
/// Serializes to the durable record format: `canvas`, `style`, `season`,
/// `age`, `seed` (nullable) and ISO-8601 `created_at` / `updated_at`.
///
/// The canvas matches `(style, season, age, seed)` except after
/// [`TreeGenerator::age`](crate::generator::TreeGenerator::age), which only
/// rotates the style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonsaiTree {
    pub(crate) canvas: Canvas,
    pub(crate) style: Style,
    pub(crate) season: Season,
    pub(crate) age: AgeStage,
    pub(crate) seed: Option<u64>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl BonsaiTree {
    /// A freshly grown tree; both timestamps are `now`.
    pub fn new(
        canvas: Canvas,
        style: Style,
        season: Season,
        age: AgeStage,
        seed: Option<u64>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            canvas,
            style,
            season,
            age,
            seed,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn style(&self) -> Style {
        self.style
    }

    pub fn season(&self) -> Season {
        self.season
    }

    pub fn age(&self) -> AgeStage {
        self.age
    }

    /// `None` when the last growth was not replayable
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// The tree as printable text, one canvas row per line
    pub fn render(&self) -> String {
        self.canvas.render()
    }

    /// One-line description for listings
    pub fn summary(&self) -> String {
        let seed = self
            .seed
            .map_or_else(|| "random".to_string(), |s| s.to_string());
        format!(
            "{} {} {} (seed {}, updated {})",
            self.age,
            self.season,
            self.style,
            seed,
            self.updated_at.to_rfc3339()
        )
    }

    /// Mark the tree as changed; `updated_at` never moves backwards.
    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.updated_at {
            self.updated_at = now;
        }
    }
}

/// Printable text for a tree; same as [`BonsaiTree::render`]
pub fn render(tree: &BonsaiTree) -> String {
    tree.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(seed: Option<u64>) -> BonsaiTree {
        let mut canvas = Canvas::blank(3, 2);
        canvas.set(1, 0, '*');
        canvas.set(1, 1, '│');
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        BonsaiTree::new(canvas, Style::Cascade, Season::Winter, AgeStage::Mature, seed, now)
    }

    #[test]
    fn test_record_field_names() {
        let value = serde_json::to_value(sample(Some(42))).unwrap();
        let object = value.as_object().unwrap();
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            ["age", "canvas", "created_at", "season", "seed", "style", "updated_at"]
        );
        assert_eq!(object["style"], "cascade");
        assert_eq!(object["season"], "winter");
        assert_eq!(object["age"], "mature");
        assert_eq!(object["seed"], 42);
        assert_eq!(object["created_at"], "2024-03-01T12:00:00Z");
        assert_eq!(object["canvas"][0][1], "*");
    }

    #[test]
    fn test_null_seed_roundtrip() {
        let tree = sample(None);
        let json = serde_json::to_string(&tree).unwrap();
        assert!(json.contains("\"seed\":null"));
        let loaded: BonsaiTree = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, tree);
    }

    #[test]
    fn test_record_field_order_is_irrelevant() {
        let json = r#"{
            "updated_at": "2024-03-02T00:00:00Z",
            "seed": 7,
            "age": "young",
            "season": "spring",
            "style": "formal",
            "canvas": [["│"]],
            "created_at": "2024-03-01T00:00:00Z"
        }"#;
        let tree: BonsaiTree = serde_json::from_str(json).unwrap();
        assert_eq!(tree.style(), Style::Formal);
        assert_eq!(tree.seed(), Some(7));
        assert_eq!(tree.render(), "│");
    }

    #[test]
    fn test_touch_never_rewinds() {
        let mut tree = sample(Some(1));
        let earlier = tree.updated_at() - chrono::Duration::hours(1);
        tree.touch(earlier);
        assert_eq!(tree.updated_at(), tree.created_at());

        let later = tree.updated_at() + chrono::Duration::hours(1);
        tree.touch(later);
        assert_eq!(tree.updated_at(), later);
        assert!(tree.created_at() < tree.updated_at());
    }

    #[test]
    fn test_summary_mentions_random_seed() {
        assert!(sample(None).summary().contains("seed random"));
        assert!(sample(Some(9)).summary().starts_with("mature winter cascade"));
    }
}
