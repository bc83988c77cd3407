//! # In-Memory Directory
//!
//! Companies keyed by slug. Every write validates the profile against the
//! sector registry and sanitises sector details, so a stored company never
//! carries details for sectors it is not assigned to or fields its sectors
//! do not declare.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use vasp_core::{CompanyId, CompanySlug, SectorId};
use vasp_sector::{PerSectorData, SectorRegistry};

use crate::company::{AmlRating, Company, CompanyError, LicenseStatus, NewCompany};

/// Errors from directory operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DirectoryError {
    #[error(transparent)]
    Invalid(#[from] CompanyError),

    #[error("a company with slug {0} already exists")]
    SlugTaken(CompanySlug),

    #[error("no company with slug {0}")]
    NotFound(String),
}

/// Listing filter. Every set criterion must match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyFilter {
    #[serde(default)]
    pub sector: Option<SectorId>,
    #[serde(default)]
    pub pakistan_operations: Option<bool>,
    #[serde(default)]
    pub license_status: Option<LicenseStatus>,
    #[serde(default)]
    pub aml_rating: Option<AmlRating>,
    /// Case-insensitive substring of name or description.
    #[serde(default)]
    pub search: Option<String>,
}

impl CompanyFilter {
    pub fn matches(&self, company: &Company) -> bool {
        let profile = &company.profile;
        if let Some(sector) = &self.sector {
            if !company.in_sector(sector) {
                return false;
            }
        }
        if self
            .pakistan_operations
            .is_some_and(|p| p != profile.pakistan_operations)
        {
            return false;
        }
        if self
            .license_status
            .is_some_and(|s| s != profile.license_status)
        {
            return false;
        }
        if self
            .aml_rating
            .is_some_and(|r| r != profile.aml_cft_compliance_rating)
        {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                profile.name.to_lowercase().contains(&needle)
                    || profile.company_description.to_lowercase().contains(&needle)
            }
            _ => true,
        }
    }
}

/// The company directory.
#[derive(Debug, Clone)]
pub struct Directory {
    registry: Arc<SectorRegistry>,
    companies: BTreeMap<CompanySlug, Company>,
}

impl Directory {
    pub fn new(registry: Arc<SectorRegistry>) -> Self {
        Self {
            registry,
            companies: BTreeMap::new(),
        }
    }

    pub fn registry(&self) -> &SectorRegistry {
        &self.registry
    }

    /// Validate and store a new company under the slug of its name.
    pub fn create(&mut self, new: NewCompany) -> Result<Company, DirectoryError> {
        new.validate(Some(self.registry.as_ref()))?;
        let slug = new.slug()?;
        if self.companies.contains_key(&slug) {
            return Err(DirectoryError::SlugTaken(slug));
        }

        let now = Utc::now();
        let company = Company {
            id: CompanyId::new(),
            slug: slug.clone(),
            profile: self.sanitize(new),
            created_at: now,
            updated_at: now,
        };
        tracing::info!(slug = %slug, sectors = company.profile.sectors.len(), "company created");
        self.companies.insert(slug, company.clone());
        Ok(company)
    }

    pub fn get(&self, slug: &str) -> Option<&Company> {
        self.find_key(slug).and_then(|key| self.companies.get(&key))
    }

    /// Replace the profile of an existing company. Id, slug and
    /// `created_at` are kept.
    pub fn update(&mut self, slug: &str, profile: NewCompany) -> Result<Company, DirectoryError> {
        profile.validate(Some(self.registry.as_ref()))?;
        let profile = self.sanitize(profile);
        let company = self.entry_mut(slug)?;
        company.profile = profile;
        company.updated_at = Utc::now();
        Ok(company.clone())
    }

    /// Replace only the sector details of an existing company.
    pub fn update_sector_details(
        &mut self,
        slug: &str,
        details: PerSectorData,
    ) -> Result<Company, DirectoryError> {
        let registry = Arc::clone(&self.registry);
        let company = self.entry_mut(slug)?;
        company.profile.sector_details = details.sanitized(&registry, &company.profile.sectors);
        company.updated_at = Utc::now();
        tracing::debug!(slug = %company.slug, "sector details saved");
        Ok(company.clone())
    }

    pub fn delete(&mut self, slug: &str) -> Result<Company, DirectoryError> {
        let key = self
            .find_key(slug)
            .ok_or_else(|| DirectoryError::NotFound(slug.to_string()))?;
        self.companies
            .remove(&key)
            .ok_or_else(|| DirectoryError::NotFound(slug.to_string()))
    }

    /// Companies matching `filter`, ordered by name (case-insensitive).
    pub fn list(&self, filter: &CompanyFilter) -> Vec<&Company> {
        let mut matched: Vec<&Company> = self
            .companies
            .values()
            .filter(|c| filter.matches(c))
            .collect();
        matched.sort_by_cached_key(|c| c.profile.name.to_lowercase());
        matched
    }

    /// Every company, ordered by name.
    pub fn all(&self) -> Vec<&Company> {
        self.list(&CompanyFilter::default())
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }

    fn sanitize(&self, mut profile: NewCompany) -> NewCompany {
        profile.sector_details = profile
            .sector_details
            .sanitized(&self.registry, &profile.sectors);
        profile
    }

    fn find_key(&self, slug: &str) -> Option<CompanySlug> {
        CompanySlug::new(slug)
            .ok()
            .filter(|key| self.companies.contains_key(key))
    }

    fn entry_mut(&mut self, slug: &str) -> Result<&mut Company, DirectoryError> {
        let key = self
            .find_key(slug)
            .ok_or_else(|| DirectoryError::NotFound(slug.to_string()))?;
        self.companies
            .get_mut(&key)
            .ok_or_else(|| DirectoryError::NotFound(slug.to_string()))
    }
}
