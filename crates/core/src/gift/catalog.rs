//! Versioned tier catalogs.
//!
//! Each [`CatalogRevision`] fixes the active relationship tiers, the bonus
//! each tier adds to the attending target, which tiers count as "top" for
//! absent guests, and (optionally) the message copy. The engine only reads
//! the catalog; adding a revision never touches the algorithm.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    domain::{recommendation::GiftMessage, selection::Relationship},
    errors::DomainError,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogRevision {
    /// Three tiers, no message copy.
    Legacy,
    /// Three tiers with message copy.
    Classic,
    /// Five tiers with message copy.
    #[default]
    Extended,
}

impl CatalogRevision {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Classic => "classic",
            Self::Extended => "extended",
        }
    }
}

impl fmt::Display for CatalogRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatalogRevision {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "classic" => Ok(Self::Classic),
            "extended" => Ok(Self::Extended),
            other => Err(format!(
                "unsupported catalog revision `{other}` (expected legacy|classic|extended)"
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierEntry {
    pub tier: Relationship,
    pub bonus: u64,
    /// Absent guests in a top tier give the larger flat amount.
    pub top_tier: bool,
}

impl TierEntry {
    fn new(tier: Relationship, bonus: u64, top_tier: bool) -> Self {
        Self { tier, bonus, top_tier }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageCatalog {
    pub premium_venue: GiftMessage,
    pub no_catering: GiftMessage,
    pub tiers: BTreeMap<Relationship, GiftMessage>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TierCatalog {
    revision: CatalogRevision,
    tiers: Vec<TierEntry>,
    messages: Option<MessageCatalog>,
}

impl TierCatalog {
    pub fn new(
        revision: CatalogRevision,
        mut tiers: Vec<TierEntry>,
        messages: Option<MessageCatalog>,
    ) -> Result<Self, DomainError> {
        if tiers.is_empty() {
            return Err(DomainError::InvariantViolation(
                "tier catalog must contain at least one tier".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for entry in &tiers {
            if !seen.insert(entry.tier) {
                return Err(DomainError::DuplicateTier(entry.tier));
            }
        }

        tiers.sort_by_key(|entry| entry.tier);
        for pair in tiers.windows(2) {
            if pair[1].bonus < pair[0].bonus {
                return Err(DomainError::DecreasingBonus { tier: pair[1].tier });
            }
            if pair[0].top_tier && !pair[1].top_tier {
                return Err(DomainError::InvariantViolation(format!(
                    "tier {:?} is less close than top tier {:?} but is not a top tier",
                    pair[1].tier, pair[0].tier
                )));
            }
        }

        if let Some(messages) = &messages {
            for entry in &tiers {
                if !messages.tiers.contains_key(&entry.tier) {
                    return Err(DomainError::MissingTierMessage(entry.tier));
                }
            }
        }

        Ok(Self { revision, tiers, messages })
    }

    pub fn for_revision(revision: CatalogRevision) -> Result<Self, DomainError> {
        match revision {
            CatalogRevision::Legacy => Self::new(revision, three_tiers(), None),
            CatalogRevision::Classic => {
                Self::new(revision, three_tiers(), Some(message_catalog(&three_tiers())))
            }
            CatalogRevision::Extended => {
                Self::new(revision, five_tiers(), Some(message_catalog(&five_tiers())))
            }
        }
    }

    /// Overrides the colleague bonus where the revision has a colleague tier.
    pub fn with_colleague_bonus(self, bonus: u64) -> Result<Self, DomainError> {
        let Self { revision, mut tiers, messages } = self;
        for entry in tiers.iter_mut().filter(|entry| entry.tier == Relationship::Colleague) {
            entry.bonus = bonus;
        }
        Self::new(revision, tiers, messages)
    }

    pub fn revision(&self) -> CatalogRevision {
        self.revision
    }

    pub fn tiers(&self) -> &[TierEntry] {
        &self.tiers
    }

    pub fn entry(&self, tier: Relationship) -> Option<&TierEntry> {
        self.tiers.iter().find(|entry| entry.tier == tier)
    }

    pub fn messages(&self) -> Option<&MessageCatalog> {
        self.messages.as_ref()
    }
}

impl Default for TierCatalog {
    fn default() -> Self {
        Self {
            revision: CatalogRevision::Extended,
            tiers: five_tiers(),
            messages: Some(message_catalog(&five_tiers())),
        }
    }
}

fn three_tiers() -> Vec<TierEntry> {
    vec![
        TierEntry::new(Relationship::Acquaintance, 0, false),
        TierEntry::new(Relationship::Friend, 30_000, false),
        TierEntry::new(Relationship::Close, 50_000, true),
    ]
}

fn five_tiers() -> Vec<TierEntry> {
    vec![
        TierEntry::new(Relationship::Acquaintance, 0, false),
        TierEntry::new(Relationship::Colleague, 0, false),
        TierEntry::new(Relationship::Friend, 20_000, false),
        TierEntry::new(Relationship::Close, 50_000, true),
        TierEntry::new(Relationship::Family, 100_000, true),
    ]
}

fn message_catalog(tiers: &[TierEntry]) -> MessageCatalog {
    MessageCatalog {
        premium_venue: GiftMessage::new(
            "호텔 예식은 식대 부담이 커요",
            "호텔은 1인 식대가 일반 웨딩홀보다 높아 혼주의 부담이 큽니다. 식대를 넉넉히 덮는 금액으로 마음을 전해 보세요.",
        ),
        no_catering: GiftMessage::new(
            "식대 부담 없이 마음만 전해요",
            "식사를 하지 않으면 혼주의 식대 부담이 없으니, 예의를 갖춘 금액으로 축하의 마음을 전하면 충분합니다.",
        ),
        tiers: tiers.iter().map(|entry| (entry.tier, tier_message(entry.tier))).collect(),
    }
}

fn tier_message(tier: Relationship) -> GiftMessage {
    match tier {
        Relationship::Acquaintance => GiftMessage::new(
            "예의를 갖춘 기본 금액",
            "가볍게 아는 사이라면 식대를 덮고 조금 남는 금액이면 충분합니다.",
        ),
        Relationship::Colleague => GiftMessage::new(
            "동료에게 무난한 금액",
            "같은 팀이나 자주 마주치는 동료라면 식대를 덮는 무난한 금액이 좋습니다.",
        ),
        Relationship::Friend => GiftMessage::new(
            "친한 친구를 위한 금액",
            "자주 연락하는 친구라면 식대에 축하의 마음을 조금 더 얹어 보세요.",
        ),
        Relationship::Close => GiftMessage::new(
            "아주 가까운 사이의 금액",
            "오래 함께한 가까운 사이라면 넉넉한 금액으로 새 출발을 응원해 주세요.",
        ),
        Relationship::Family => GiftMessage::new(
            "가족에게 전하는 금액",
            "가족이나 친척이라면 형편에 맞게 가장 넉넉한 금액을 준비하는 경우가 많습니다.",
        ),
    }
}
