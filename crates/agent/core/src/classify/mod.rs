//! Target classification: splits one tick's detections into semantic pools.
//!
//! Matching is data-driven: each [`Category`] owns a keyword list (see
//! [`KeywordConfig`]) and a detection belongs to the first category, in
//! [`Category::PRECEDENCE`] order, whose keywords occur in its lowercased type
//! label. Vitals bars are tested first so they never leak into entity pools.

mod vitals;

pub use vitals::Vitals;

use crate::config::KeywordConfig;
use crate::detection::Detection;

/// Canonical detection categories.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Category {
    Enemy,
    Loot,
    Resource,
    /// The player character itself.
    Player,
    /// Player HP bar.
    Health,
    /// Player mana bar.
    Mana,
}

impl Category {
    /// Evaluation order; the first matching category wins.
    pub const PRECEDENCE: [Category; 6] = [
        Category::Health,
        Category::Mana,
        Category::Player,
        Category::Enemy,
        Category::Loot,
        Category::Resource,
    ];
}

/// Returns the category of `detection`, if any keyword matches.
pub fn categorize(detection: &Detection, keywords: &KeywordConfig) -> Option<Category> {
    let kind = detection.kind.to_ascii_lowercase();
    Category::PRECEDENCE.into_iter().find(|&category| {
        keywords
            .keywords(category)
            .iter()
            .any(|keyword| kind.contains(keyword.as_str()))
    })
}

/// One tick's detections, partitioned.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClassifiedFrame {
    pub enemies: Vec<Detection>,
    pub loot: Vec<Detection>,
    pub resources: Vec<Detection>,
    /// Player character detections (normally zero or one).
    pub players: Vec<Detection>,
    /// Vitals after this tick's readings were applied.
    pub vitals: Vitals,
}

/// Stateful classifier: the only state is the last known vitals, which are
/// retained unchanged across ticks that carry no reading.
#[derive(Clone, Debug, Default)]
pub struct Classifier {
    vitals: Vitals,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vitals(&self) -> Vitals {
        self.vitals
    }

    /// Overrides the HP reading with an out-of-band estimate.
    pub fn set_hp(&mut self, hp: f64) {
        self.vitals.hp = hp.clamp(0.0, 100.0);
    }

    pub fn reset(&mut self) {
        self.vitals = Vitals::default();
    }

    /// Partitions `detections` and updates vitals.
    pub fn classify(&mut self, detections: &[Detection], keywords: &KeywordConfig) -> ClassifiedFrame {
        let mut frame = ClassifiedFrame::default();

        for detection in detections {
            match categorize(detection, keywords) {
                Some(Category::Health) => self.vitals.hp = Vitals::read_bar(detection),
                Some(Category::Mana) => self.vitals.mana = Vitals::read_bar(detection),
                Some(Category::Player) => frame.players.push(detection.clone()),
                Some(Category::Enemy) => frame.enemies.push(detection.clone()),
                Some(Category::Loot) => frame.loot.push(detection.clone()),
                Some(Category::Resource) => frame.resources.push(detection.clone()),
                None => {}
            }
        }

        frame.vitals = self.vitals;

        tracing::debug!(
            enemies = frame.enemies.len(),
            loot = frame.loot.len(),
            resources = frame.resources.len(),
            hp = frame.vitals.hp,
            "classified frame"
        );

        frame
    }
}
