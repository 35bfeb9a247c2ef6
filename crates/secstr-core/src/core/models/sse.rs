use crate::core::utils::diagnostics::{DiagnosticKind, Diagnostics};
use itertools::Itertools;
use phf::{Map, phf_map};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SseType {
    NotFound,
    MixedHelix,
    HelixG, // 3-10 helix
    HelixH, // Alpha helix
    HelixI, // Pi helix
    Sheet,
    IsolatedBridge,
    TurnC7,
    WiggleC7,

    BulgeAntiparallelUnspecified,
    BulgeParallelUnspecified,

    // --- Antiparallel bulges: lowercase = short (donor) side, uppercase = long (acceptor) side ---
    BulgeClassicShort,
    BulgeClassicLong,
    BulgeWideShort,
    BulgeWideLong,
    BulgeAntiparallel33Short,
    BulgeAntiparallel33Long,
    BulgeAntiparallel22Short,
    BulgeAntiparallel22Long,
    BulgeAntiparallel15Short,
    BulgeAntiparallel15Long,
    BulgeAntiparallel23Short,
    BulgeAntiparallel23Long,

    // --- Parallel bulges ---
    BulgeParallel14Short,
    BulgeParallel14Long,
    BulgeParallel32Short,
    BulgeParallel32Long,
    BulgeParallel13Short,
    BulgeParallel13Long,
    BulgeParallel33Short,
    BulgeParallel33Long,
}

static SSE_TYPE_CODES: Map<&'static str, SseType> = phf_map! {
    "X" => SseType::NotFound,
    "h" => SseType::MixedHelix,
    "G" => SseType::HelixG,
    "H" => SseType::HelixH,
    "I" => SseType::HelixI,
    "E" => SseType::Sheet,
    "B" => SseType::IsolatedBridge,
    "C" => SseType::TurnC7,
    "W" => SseType::WiggleC7,
    "bA" => SseType::BulgeAntiparallelUnspecified,
    "bP" => SseType::BulgeParallelUnspecified,
    "n" => SseType::BulgeClassicShort,
    "N" => SseType::BulgeClassicLong,
    "m" => SseType::BulgeWideShort,
    "M" => SseType::BulgeWideLong,
    "u" => SseType::BulgeAntiparallel33Short,
    "U" => SseType::BulgeAntiparallel33Long,
    "t" => SseType::BulgeAntiparallel22Short,
    "T" => SseType::BulgeAntiparallel22Long,
    "s" => SseType::BulgeAntiparallel15Short,
    "S" => SseType::BulgeAntiparallel15Long,
    "o" => SseType::BulgeAntiparallel23Short,
    "O" => SseType::BulgeAntiparallel23Long,
    "p" => SseType::BulgeParallel14Short,
    "P" => SseType::BulgeParallel14Long,
    "q" => SseType::BulgeParallel32Short,
    "Q" => SseType::BulgeParallel32Long,
    "r" => SseType::BulgeParallel13Short,
    "R" => SseType::BulgeParallel13Long,
    "l" => SseType::BulgeParallel33Short,
    "L" => SseType::BulgeParallel33Long,
};

impl SseType {
    /// The DSSP-style one- or two-letter code of this type.
    pub fn code(self) -> &'static str {
        match self {
            SseType::NotFound => "X",
            SseType::MixedHelix => "h",
            SseType::HelixG => "G",
            SseType::HelixH => "H",
            SseType::HelixI => "I",
            SseType::Sheet => "E",
            SseType::IsolatedBridge => "B",
            SseType::TurnC7 => "C",
            SseType::WiggleC7 => "W",
            SseType::BulgeAntiparallelUnspecified => "bA",
            SseType::BulgeParallelUnspecified => "bP",
            SseType::BulgeClassicShort => "n",
            SseType::BulgeClassicLong => "N",
            SseType::BulgeWideShort => "m",
            SseType::BulgeWideLong => "M",
            SseType::BulgeAntiparallel33Short => "u",
            SseType::BulgeAntiparallel33Long => "U",
            SseType::BulgeAntiparallel22Short => "t",
            SseType::BulgeAntiparallel22Long => "T",
            SseType::BulgeAntiparallel15Short => "s",
            SseType::BulgeAntiparallel15Long => "S",
            SseType::BulgeAntiparallel23Short => "o",
            SseType::BulgeAntiparallel23Long => "O",
            SseType::BulgeParallel14Short => "p",
            SseType::BulgeParallel14Long => "P",
            SseType::BulgeParallel32Short => "q",
            SseType::BulgeParallel32Long => "Q",
            SseType::BulgeParallel13Short => "r",
            SseType::BulgeParallel13Long => "R",
            SseType::BulgeParallel33Short => "l",
            SseType::BulgeParallel33Long => "L",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        SSE_TYPE_CODES.get(code).copied()
    }

    pub fn is_helix(self) -> bool {
        matches!(
            self,
            SseType::HelixG | SseType::HelixH | SseType::HelixI | SseType::MixedHelix
        )
    }

    pub fn is_sheet(self) -> bool {
        matches!(self, SseType::Sheet | SseType::IsolatedBridge)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown SSE type code: '{0}'")]
pub struct ParseSseTypeError(pub String);

impl FromStr for SseType {
    type Err = ParseSseTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SseType::from_code(s).ok_or_else(|| ParseSseTypeError(s.to_string()))
    }
}

impl fmt::Display for SseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for SseType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for SseType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(serde::de::Error::custom)
    }
}

/// Rule folding two segment types into the type of their union.
pub type TypeCombining = fn(SseType, SseType) -> Option<SseType>;

/// Equal types are kept, helix types fuse into a mixed helix, sheet types
/// into a sheet. Any other pair has no combined type.
pub fn default_type_combining(x: SseType, y: SseType) -> Option<SseType> {
    if x == y {
        Some(x)
    } else if x.is_helix() && y.is_helix() {
        Some(SseType::MixedHelix)
    } else if x.is_sheet() && y.is_sheet() {
        Some(SseType::Sheet)
    } else {
        None
    }
}

/// A secondary structure element: a typed, contiguous residue range of one chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sse {
    pub label: Option<String>,
    pub chain_id: String,
    pub start: isize,
    pub end: isize,
    #[serde(rename = "type")]
    pub sse_type: SseType,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sheet_id: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub nested: Vec<Sse>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SseJoinError {
    #[error("At least 2 SSEs are required for joining, got {count}")]
    TooFewSegments { count: usize },

    #[error("Joined SSEs must be in the same chain, got chains: {chains:?}")]
    MixedChains { chains: Vec<String> },
}

impl Sse {
    pub fn new(
        label: Option<String>,
        chain_id: &str,
        start: isize,
        end: isize,
        sse_type: SseType,
        sheet_id: Option<usize>,
    ) -> Self {
        Self {
            label,
            chain_id: chain_id.to_string(),
            start,
            end,
            sse_type,
            sheet_id,
            comment: None,
            nested: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn add_comment(&mut self, comment: &str) {
        match &mut self.comment {
            Some(existing) => existing.push_str(comment),
            None => self.comment = Some(comment.to_string()),
        }
    }

    pub fn add_nested(&mut self, nested: Sse) {
        self.nested.push(nested);
    }

    pub fn len(&self) -> usize {
        (self.end - self.start + 1).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Whether `other` lies within this element's range on the same chain.
    pub fn contains(&self, other: &Sse) -> bool {
        self.chain_id == other.chain_id && self.start <= other.start && other.end <= self.end
    }

    /// Ordering key used for output: chain, then start, then end.
    pub fn order_key(&self) -> (&str, isize, isize) {
        (self.chain_id.as_str(), self.start, self.end)
    }
}

/// Merges `sses` into one element spanning all of them.
///
/// The inputs are kept as nested children. Differing sheet ids are reported to
/// `diagnostics` and resolved in favour of the earliest-starting input.
pub fn join(
    sses: Vec<Sse>,
    combining: TypeCombining,
    diagnostics: &mut Diagnostics,
) -> Result<Sse, SseJoinError> {
    if sses.len() < 2 {
        return Err(SseJoinError::TooFewSegments { count: sses.len() });
    }

    let chains: Vec<String> = sses.iter().map(|s| s.chain_id.clone()).unique().collect();
    if chains.len() > 1 {
        return Err(SseJoinError::MixedChains { chains });
    }

    let sheet_ids: Vec<Option<usize>> = sses.iter().map(|s| s.sheet_id).unique().collect();
    if sheet_ids.len() > 1 {
        let listed = sheet_ids
            .iter()
            .map(|id| id.map_or_else(|| "none".to_string(), |id| id.to_string()))
            .join(", ");
        diagnostics.warn(
            DiagnosticKind::SheetIdConflict,
            format!("Joining beta-strands with different sheet ID ({listed})"),
        );
    }

    let sse_type = sses
        .iter()
        .map(|s| s.sse_type)
        .reduce(|x, y| combining(x, y).unwrap_or(SseType::NotFound))
        .unwrap_or(SseType::NotFound);

    // min_by_key / max_by_key keep the first minimum and the last maximum.
    let first = sses.iter().min_by_key(|s| s.start).unwrap_or(&sses[0]);
    let last_end = sses.iter().map(|s| s.end).max().unwrap_or(first.end);

    let label = sses
        .iter()
        .map(|s| s.label.as_deref().unwrap_or(""))
        .join("+");
    let mut joined = Sse::new(
        Some(label),
        &chains[0],
        first.start,
        last_end,
        sse_type,
        first.sheet_id,
    );

    joined.add_comment(&format!(
        "Created by joining {} SSEs: {}.",
        sses.len(),
        sses.iter()
            .map(|s| s.label.as_deref().unwrap_or(""))
            .join(", ")
    ));
    for sse in sses {
        if let Some(comment) = &sse.comment {
            joined.add_comment(comment);
        }
        joined.add_nested(sse);
    }
    Ok(joined)
}
