//! Feature-table emission for downstream model training.
//!
//! Scalar diagnostics from each analysis are flattened into one row of a
//! shared CSV table. The table is append-only and written by exactly one
//! writer at a time: the CLI appends rows serially after the (possibly
//! parallel) analyses have completed, so no file locking is needed here.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use roadspectra_core::SpectralMetrics;

/// Column header of the master feature table.
pub const HEADER: &str = "city,nodes,edges,rho,sigma_max,h2_norm,kreiss,avg_degree,critical_street_id";

/// One flattened feature row.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    /// Network display name
    pub city: String,
    /// Node count
    pub nodes: usize,
    /// Edge count
    pub edges: usize,
    /// Spectral radius
    pub rho: f64,
    /// Top singular value
    pub sigma_max: f64,
    /// H2 norm
    pub h2_norm: f64,
    /// Approximate Kreiss constant
    pub kreiss: f64,
    /// Average degree
    pub avg_degree: f64,
    /// Critical street id, `N/A` when absent
    pub critical_street_id: String,
}

impl FeatureRow {
    /// Flatten a metrics record into a row.
    #[must_use]
    pub fn from_metrics(city: &str, metrics: &SpectralMetrics) -> Self {
        Self {
            city: city.to_string(),
            nodes: metrics.node_count,
            edges: metrics.edge_count,
            rho: metrics.spectral_radius,
            sigma_max: metrics.h_inf_norm,
            h2_norm: metrics.h2_norm,
            kreiss: metrics.kreiss_constant,
            avg_degree: metrics.avg_degree,
            critical_street_id: metrics
                .critical_street
                .as_ref()
                .map_or_else(|| "N/A".to_string(), |cs| cs.id.clone()),
        }
    }

    /// Render as one CSV line. Commas in text fields are replaced to keep
    /// the table trivially parseable.
    #[must_use]
    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{}",
            self.city.replace(',', ";"),
            self.nodes,
            self.edges,
            self.rho,
            self.sigma_max,
            self.h2_norm,
            self.kreiss,
            self.avg_degree,
            self.critical_street_id.replace(',', ";"),
        )
    }
}

/// Append a row to the master table, writing the header first when the
/// file does not exist yet.
pub fn append_feature_row(path: &Path, row: &FeatureRow) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating feature table directory {}", parent.display()))?;
        }
    }

    let new_file = !path.exists();
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening feature table {}", path.display()))?;

    if new_file {
        writeln!(file, "{HEADER}")?;
    }
    writeln!(file, "{}", row.to_csv_line())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadspectra_core::Eigenvalue;

    fn sample_metrics() -> SpectralMetrics {
        SpectralMetrics {
            node_count: 10,
            edge_count: 25,
            avg_degree: 2.5,
            spectral_radius: 1.5,
            eigenvalues: vec![Eigenvalue::new(1.5, 0.0)],
            singular_values: vec![1.6],
            u1: vec![0.0; 10],
            v1: vec![0.0; 10],
            h2_norm: 5.0,
            h_inf_norm: 1.6,
            kreiss_constant: 12.5,
            critical_street: None,
        }
    }

    #[test]
    fn test_row_flattening_uses_na_for_missing_street() {
        let row = FeatureRow::from_metrics("paris", &sample_metrics());
        assert_eq!(row.critical_street_id, "N/A");
        assert_eq!(row.to_csv_line(), "paris,10,25,1.5,1.6,5,12.5,2.5,N/A");
    }

    #[test]
    fn test_commas_in_names_are_sanitized() {
        let row = FeatureRow::from_metrics("Paris, France", &sample_metrics());
        assert!(row.to_csv_line().starts_with("Paris; France,"));
    }

    #[test]
    fn test_append_creates_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features.csv");
        let row = FeatureRow::from_metrics("a", &sample_metrics());

        append_feature_row(&path, &row).unwrap();
        append_feature_row(&path, &row).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], HEADER);
        assert_eq!(lines[1], lines[2]);
    }
}
