//! # Directory Report
//!
//! Headline counts for the regulator plus a per-sector breakdown. A company
//! assigned to several sectors is counted once in the totals and once in
//! each of its sectors.

use serde::{Deserialize, Serialize};

use vasp_core::SectorId;
use vasp_sector::SectorRegistry;

use crate::company::{AmlRating, LicenseStatus, NewCompany};

/// Directory-wide counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTotals {
    pub total_companies: usize,
    pub pakistan_companies: usize,
    pub international_companies: usize,
    /// Licence granted.
    pub licensed_companies: usize,
    /// Applied or under review.
    pub pending_applications: usize,
    pub high_aml_compliance: usize,
}

/// Counts for one sector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorBreakdown {
    pub sector_id: SectorId,
    /// Schema title, or the id for sectors without a schema.
    pub title: String,
    pub total: usize,
    pub pakistan_based: usize,
    pub licensed: usize,
    pub companies: Vec<String>,
}

/// Company names grouped under one licence status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusGroup {
    pub status: LicenseStatus,
    pub companies: Vec<String>,
}

/// The summary report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryReport {
    pub summary: ReportTotals,
    /// Registry order first, then sectors without a schema in id order.
    /// Sectors with no companies are omitted.
    pub by_sector: Vec<SectorBreakdown>,
    /// One group per status, in [`LicenseStatus::ALL`] order.
    pub license_status: Vec<StatusGroup>,
}

impl DirectoryReport {
    pub fn build<'a>(
        registry: &SectorRegistry,
        companies: impl IntoIterator<Item = &'a NewCompany>,
    ) -> Self {
        let companies: Vec<&NewCompany> = companies.into_iter().collect();

        let summary = ReportTotals {
            total_companies: companies.len(),
            pakistan_companies: companies.iter().filter(|c| c.pakistan_operations).count(),
            international_companies: companies.iter().filter(|c| !c.pakistan_operations).count(),
            licensed_companies: companies
                .iter()
                .filter(|c| c.license_status == LicenseStatus::Granted)
                .count(),
            pending_applications: companies
                .iter()
                .filter(|c| c.license_status.is_pending())
                .count(),
            high_aml_compliance: companies
                .iter()
                .filter(|c| c.aml_cft_compliance_rating == AmlRating::High)
                .count(),
        };

        let mut sector_order: Vec<SectorId> = registry.sector_ids().cloned().collect();
        let mut unknown: Vec<SectorId> = companies
            .iter()
            .flat_map(|c| c.sectors.iter())
            .filter(|s| !registry.contains(s))
            .cloned()
            .collect();
        unknown.sort();
        unknown.dedup();
        sector_order.extend(unknown);

        let by_sector = sector_order
            .into_iter()
            .filter_map(|sector| {
                let members: Vec<&&NewCompany> =
                    companies.iter().filter(|c| c.sectors.contains(&sector)).collect();
                if members.is_empty() {
                    return None;
                }
                let title = registry
                    .lookup(&sector)
                    .map(|s| s.title.clone())
                    .unwrap_or_else(|| sector.to_string());
                Some(SectorBreakdown {
                    title,
                    total: members.len(),
                    pakistan_based: members.iter().filter(|c| c.pakistan_operations).count(),
                    licensed: members
                        .iter()
                        .filter(|c| c.license_status == LicenseStatus::Granted)
                        .count(),
                    companies: members.iter().map(|c| c.name.clone()).collect(),
                    sector_id: sector,
                })
            })
            .collect();

        let license_status = LicenseStatus::ALL
            .into_iter()
            .map(|status| StatusGroup {
                status,
                companies: companies
                    .iter()
                    .filter(|c| c.license_status == status)
                    .map(|c| c.name.clone())
                    .collect(),
            })
            .collect();

        Self {
            summary,
            by_sector,
            license_status,
        }
    }

    pub fn sector(&self, sector: &SectorId) -> Option<&SectorBreakdown> {
        self.by_sector.iter().find(|b| &b.sector_id == sector)
    }
}
