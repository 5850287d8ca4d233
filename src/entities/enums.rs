//! Enumerated field values. The labels are stored verbatim in the database.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{AtlasError, Result};

/// Investor `Type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvestorType {
    VcFirm,
    Angel,
    PeFirm,
    CorporateVc,
    Bank,
}

impl InvestorType {
    pub const ALL: [InvestorType; 5] = [
        Self::VcFirm,
        Self::Angel,
        Self::PeFirm,
        Self::CorporateVc,
        Self::Bank,
    ];

    pub const LABELS: [&'static str; 5] = ["VC Firm", "Angel", "PE Firm", "Corporate VC", "Bank"];

    pub fn label(&self) -> &'static str {
        match self {
            Self::VcFirm => "VC Firm",
            Self::Angel => "Angel",
            Self::PeFirm => "PE Firm",
            Self::CorporateVc => "Corporate VC",
            Self::Bank => "Bank",
        }
    }

    /// Parses an exact stored label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label)
    }

    /// Parses operator input, ignoring case.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(input))
            .ok_or_else(|| {
                AtlasError::validation(format!(
                    "Unknown investor type '{}'. Expected one of: {}",
                    input,
                    Self::LABELS.join(", ")
                ))
            })
    }
}

impl fmt::Display for InvestorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for InvestorType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Funding round `Stage` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FundingStage {
    PreSeed,
    Seed,
    SeriesA,
    SeriesB,
    SeriesC,
    SeriesD,
    SeriesEPlus,
    Ipo,
}

impl FundingStage {
    pub const ALL: [FundingStage; 8] = [
        Self::PreSeed,
        Self::Seed,
        Self::SeriesA,
        Self::SeriesB,
        Self::SeriesC,
        Self::SeriesD,
        Self::SeriesEPlus,
        Self::Ipo,
    ];

    pub const LABELS: [&'static str; 8] = [
        "Pre-Seed",
        "Seed",
        "Series A",
        "Series B",
        "Series C",
        "Series D",
        "Series E+",
        "IPO",
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::PreSeed => "Pre-Seed",
            Self::Seed => "Seed",
            Self::SeriesA => "Series A",
            Self::SeriesB => "Series B",
            Self::SeriesC => "Series C",
            Self::SeriesD => "Series D",
            Self::SeriesEPlus => "Series E+",
            Self::Ipo => "IPO",
        }
    }

    /// Parses an exact stored label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }

    /// Parses operator input, ignoring case.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.label().eq_ignore_ascii_case(input))
            .ok_or_else(|| {
                AtlasError::validation(format!(
                    "Unknown stage '{}'. Expected one of: {}",
                    input,
                    Self::LABELS.join(", ")
                ))
            })
    }
}

impl fmt::Display for FundingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for FundingStage {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}
