//! # Company Records
//!
//! A [`Company`] is one VASP listed in the directory: its public profile,
//! the regulatory sectors it operates in (first = primary), its PVARA
//! licensing position, and the sector-specific details collected by the
//! sector form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use vasp_core::{CompanyId, CompanySlug, SectorId};
use vasp_sector::{PerSectorData, SectorRegistry};

// ─── Licensing ───────────────────────────────────────────────────────

/// PVARA licence position of a company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LicenseStatus {
    Applied,
    Granted,
    Suspended,
    /// No licence held or applied for.
    #[default]
    None,
    #[serde(rename = "Under Review")]
    UnderReview,
}

impl LicenseStatus {
    pub const ALL: [LicenseStatus; 5] = [
        Self::Applied,
        Self::Granted,
        Self::Suspended,
        Self::None,
        Self::UnderReview,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applied => "Applied",
            Self::Granted => "Granted",
            Self::Suspended => "Suspended",
            Self::None => "None",
            Self::UnderReview => "Under Review",
        }
    }

    /// Applied or under review.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Applied | Self::UnderReview)
    }
}

impl std::fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LicenseStatus {
    type Err = CompanyError;

    /// Case-insensitive; an empty string reads as [`LicenseStatus::None`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::None);
        }
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CompanyError::UnknownLicenseStatus(s.to_string()))
    }
}

/// AML/CFT compliance rating assigned during supervision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AmlRating {
    High,
    Medium,
    Low,
    #[default]
    #[serde(rename = "Not Assessed")]
    NotAssessed,
}

impl AmlRating {
    pub const ALL: [AmlRating; 4] = [Self::High, Self::Medium, Self::Low, Self::NotAssessed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::NotAssessed => "Not Assessed",
        }
    }
}

impl std::fmt::Display for AmlRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AmlRating {
    type Err = CompanyError;

    /// Case-insensitive; an empty string reads as [`AmlRating::NotAssessed`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::NotAssessed);
        }
        Self::ALL
            .into_iter()
            .find(|rating| rating.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CompanyError::UnknownAmlRating(s.to_string()))
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// A company profile that cannot be stored.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompanyError {
    #[error("company name is required")]
    MissingName,

    #[error("company name {0:?} has no letters or digits to build a slug from")]
    UnsluggableName(String),

    #[error("headquarters location is required")]
    MissingHeadquarters,

    #[error("at least one sector is required")]
    NoSectors,

    #[error("sector {0} is listed more than once")]
    DuplicateSector(SectorId),

    #[error("unknown sector {0}")]
    UnknownSector(SectorId),

    #[error("contact email {0:?} is not an email address")]
    InvalidEmail(String),

    #[error("unknown license status {0:?}")]
    UnknownLicenseStatus(String),

    #[error("unknown AML/CFT rating {0:?}")]
    UnknownAmlRating(String),
}

// ─── Profile ─────────────────────────────────────────────────────────

/// Everything an administrator supplies for a company. Used both to create
/// and to replace a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewCompany {
    pub name: String,
    /// Assigned sectors; the first is the primary sector.
    pub sectors: Vec<SectorId>,
    pub headquarters_location: String,
    #[serde(default)]
    pub pakistan_operations: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_founded: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub founder_ceo_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_funding_pkr: Option<u64>,
    #[serde(default)]
    pub key_partnerships: Vec<String>,
    #[serde(default)]
    pub company_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secp_registration_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pvara_license_number: Option<String>,
    #[serde(default)]
    pub license_status: LicenseStatus,
    #[serde(default)]
    pub aml_cft_compliance_rating: AmlRating,
    /// Sector form data, keyed by sector then field.
    #[serde(default)]
    pub sector_details: PerSectorData,
}

impl NewCompany {
    /// Minimal profile: name, headquarters and sectors.
    pub fn new(
        name: impl Into<String>,
        headquarters_location: impl Into<String>,
        sectors: Vec<SectorId>,
    ) -> Self {
        Self {
            name: name.into(),
            headquarters_location: headquarters_location.into(),
            sectors,
            ..Self::default()
        }
    }

    /// Check the profile. Sector ids are checked against `registry` when one
    /// is supplied; without one any well-formed id is accepted.
    pub fn validate(&self, registry: Option<&SectorRegistry>) -> Result<(), CompanyError> {
        if self.name.trim().is_empty() {
            return Err(CompanyError::MissingName);
        }
        if self.headquarters_location.trim().is_empty() {
            return Err(CompanyError::MissingHeadquarters);
        }
        if self.sectors.is_empty() {
            return Err(CompanyError::NoSectors);
        }
        for (i, sector) in self.sectors.iter().enumerate() {
            if self.sectors[..i].contains(sector) {
                return Err(CompanyError::DuplicateSector(sector.clone()));
            }
            if let Some(registry) = registry {
                if !registry.contains(sector) {
                    return Err(CompanyError::UnknownSector(sector.clone()));
                }
            }
        }
        if let Some(email) = self.contact_email.as_deref() {
            if !is_plausible_email(email) {
                return Err(CompanyError::InvalidEmail(email.to_string()));
            }
        }
        Ok(())
    }

    /// Slug derived from the name.
    pub fn slug(&self) -> Result<CompanySlug, CompanyError> {
        CompanySlug::from_name(&self.name)
            .map_err(|_| CompanyError::UnsluggableName(self.name.clone()))
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

// ─── Company ─────────────────────────────────────────────────────────

/// A stored directory entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    /// Fixed at creation; renaming a company keeps its slug.
    pub slug: CompanySlug,
    #[serde(flatten)]
    pub profile: NewCompany,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Company {
    pub fn name(&self) -> &str {
        &self.profile.name
    }

    /// First assigned sector.
    pub fn primary_sector(&self) -> Option<&SectorId> {
        self.profile.sectors.first()
    }

    pub fn in_sector(&self, sector: &SectorId) -> bool {
        self.profile.sectors.contains(sector)
    }
}
