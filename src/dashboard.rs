//! Dashboard Module
//! Fixed section sequence over the filtered table. Each section checks its
//! own columns and degrades to `Unavailable` when the schema lacks them, so
//! one missing column never takes down the rest of the page.

use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::agg::{AggError, AggregationResult, Aggregator};
use crate::clean::category::{bucket_low_frequency, MIN_CATEGORY_COUNT, NONE_SENTINEL};
use crate::clean::{clean_age_column, clean_gcs_column};
use crate::data::{normalize_columns, require_columns, DataFilter, FilterSelection};

/// Expected column labels (post-trim). Any of them may be absent.
pub mod columns {
    pub const GENDER: &str = "Gender";
    pub const AGE: &str = "Age";
    pub const SLICE_1MM: &str = "Slice Thickness (in mm) - 1mm";
    pub const SLICE_5MM: &str = "Slice Thickness (in mm) - 5mm";
    pub const SLICE_OTHERS: &str = "Slice Thickness (in mm) - others";
    pub const SOURCE_OVIYAM: &str = "Data Obtained from - Oviyam";
    pub const SOURCE_CENTRICITY: &str = "Data Obtained from - Centricity";
    pub const PATHOLOGY_TRAUMA: &str = "Pathology- Trauma/ Head Injury";
    pub const PATHOLOGY_STROKE: &str = "Pathology- stroke";
    pub const GCS_ADMISSION: &str = "Admission GCS - Score";
    pub const GCS_DISCHARGE: &str = "Discharge GCS - Score";
    pub const INJURY_SIDE: &str = "Side Present in (L/R)";
    pub const INJURY_VOLUME: &str = "Volume in mm";
    pub const MIDLINE_SHIFT: &str = "Midline Shift";
    pub const BLEED_SUBCATEGORY: &str = "Bleed Subcategory";
    pub const BLEED_LOCATION: &str = "Location";
    pub const PATHOLOGY_EXTRACTED: &str = "Pathology Extracted";
}

/// Free-text locations shown per chart.
pub const TOP_LOCATION_LIMIT: usize = 10;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error(transparent)]
    Agg(#[from] AggError),
}

/// One chart's data, or the reason it is not on the page.
#[derive(Debug, Clone, Serialize)]
pub enum Section<T> {
    Ready(T),
    Unavailable { missing: Vec<String> },
}

impl<T> Section<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Section::Ready(value) => Some(value),
            Section::Unavailable { .. } => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Section::Ready(_))
    }
}

/// Cleaned age series plus the count of cells the parser gave up on, so the
/// page can report data quality next to the histogram.
#[derive(Debug, Clone, Serialize)]
pub struct AgeDistribution {
    pub years: Vec<f64>,
    pub unparseable: usize,
}

/// Admission vs. discharge scores in long form ("stage", "score").
#[derive(Debug, Clone)]
pub struct GcsComparison {
    pub long: DataFrame,
}

/// Everything one render pass produces. Recomputed from scratch on every
/// filter change; nothing here outlives the render.
#[derive(Debug, Clone)]
pub struct DashboardPass {
    pub age: Section<AgeDistribution>,
    pub gender_counts: Section<AggregationResult>,
    pub slice_thickness: Section<AggregationResult>,
    pub data_sources: Section<AggregationResult>,
    pub pathology: Section<AggregationResult>,
    pub gcs: Section<GcsComparison>,
    pub injury_side: Section<AggregationResult>,
    pub injury_volume: Section<Vec<f64>>,
    pub midline_shift: Section<AggregationResult>,
    pub bleed_subcategory: Section<AggregationResult>,
    pub top_locations: Section<AggregationResult>,
    pub top_pathologies: Section<AggregationResult>,
    /// The filtered table itself, for the raw-data preview.
    pub filtered: DataFrame,
}

/// The loaded dataset plus the per-pass computation over it. The source
/// frame is immutable after construction; filtering always produces a new
/// frame.
pub struct Dashboard {
    df: DataFrame,
}

impl Dashboard {
    /// Wrap a freshly loaded frame, trimming its column labels once.
    pub fn new(df: DataFrame) -> Result<Self, DashboardError> {
        let df = normalize_columns(df)?;
        Ok(Self { df })
    }

    pub fn table(&self) -> &DataFrame {
        &self.df
    }

    /// Selector options for the gender filter ("All" plus observed values).
    pub fn gender_options(&self) -> Vec<String> {
        let mut options = vec![crate::data::ALL_SENTINEL.to_string()];
        options.extend(DataFilter::options(&self.df, columns::GENDER));
        options
    }

    /// Run one full recompute for the given filter selection.
    pub fn render_pass(
        &self,
        selection: &FilterSelection,
    ) -> Result<DashboardPass, DashboardError> {
        let filtered = if crate::data::has_column(&self.df, columns::GENDER) {
            DataFilter::apply(&self.df, columns::GENDER, selection)?
        } else {
            // No gender column means no filtering; the selector section
            // reports itself unavailable below.
            self.df.clone()
        };

        let pass = DashboardPass {
            age: self.age_section(&filtered)?,
            gender_counts: self.gender_section(&filtered)?,
            slice_thickness: self.slice_thickness_section(&filtered)?,
            data_sources: self.data_sources_section(&filtered)?,
            pathology: self.pathology_section(&filtered)?,
            gcs: self.gcs_section(&filtered)?,
            injury_side: self.injury_side_section(&filtered)?,
            injury_volume: self.injury_volume_section(&filtered)?,
            midline_shift: self.midline_shift_section(&filtered)?,
            bleed_subcategory: self.bleed_subcategory_section(&filtered)?,
            top_locations: self.top_locations_section(&filtered)?,
            top_pathologies: self.top_pathologies_section(&filtered)?,
            filtered,
        };
        Ok(pass)
    }

    fn age_section(&self, df: &DataFrame) -> Result<Section<AgeDistribution>, DashboardError> {
        gated(df, &[columns::AGE], |df| {
            let cleaned = clean_age_column(df, columns::AGE)?;
            Ok(AgeDistribution {
                years: cleaned.present(),
                unparseable: cleaned.unparseable,
            })
        })
    }

    fn gender_section(
        &self,
        df: &DataFrame,
    ) -> Result<Section<AggregationResult>, DashboardError> {
        gated(df, &[columns::GENDER], |df| {
            Ok(Aggregator::value_counts(df, columns::GENDER)?)
        })
    }

    fn slice_thickness_section(
        &self,
        df: &DataFrame,
    ) -> Result<Section<AggregationResult>, DashboardError> {
        gated(
            df,
            &[columns::SLICE_1MM, columns::SLICE_5MM, columns::SLICE_OTHERS],
            |df| {
                Ok(Aggregator::presence_counts(
                    df,
                    &[
                        (columns::SLICE_1MM, "1mm"),
                        (columns::SLICE_5MM, "5mm"),
                        (columns::SLICE_OTHERS, "others"),
                    ],
                )?)
            },
        )
    }

    fn data_sources_section(
        &self,
        df: &DataFrame,
    ) -> Result<Section<AggregationResult>, DashboardError> {
        gated(
            df,
            &[columns::SOURCE_OVIYAM, columns::SOURCE_CENTRICITY],
            |df| {
                Ok(Aggregator::flag_sums(
                    df,
                    &[
                        (columns::SOURCE_OVIYAM, "Oviyam"),
                        (columns::SOURCE_CENTRICITY, "Centricity"),
                    ],
                )?)
            },
        )
    }

    fn pathology_section(
        &self,
        df: &DataFrame,
    ) -> Result<Section<AggregationResult>, DashboardError> {
        gated(
            df,
            &[columns::PATHOLOGY_TRAUMA, columns::PATHOLOGY_STROKE],
            |df| {
                Ok(Aggregator::flag_sums(
                    df,
                    &[
                        (columns::PATHOLOGY_TRAUMA, "Trauma/Head Injury"),
                        (columns::PATHOLOGY_STROKE, "Stroke"),
                    ],
                )?)
            },
        )
    }

    fn gcs_section(&self, df: &DataFrame) -> Result<Section<GcsComparison>, DashboardError> {
        gated(
            df,
            &[columns::GCS_ADMISSION, columns::GCS_DISCHARGE],
            |df| {
                let admission = clean_gcs_column(df, columns::GCS_ADMISSION)?;
                let discharge = clean_gcs_column(df, columns::GCS_DISCHARGE)?;

                let admission: Vec<Option<f64>> = admission
                    .values
                    .iter()
                    .copied()
                    .map(|v| v.map(|score| score as f64))
                    .collect();
                let discharge: Vec<Option<f64>> = discharge
                    .values
                    .iter()
                    .copied()
                    .map(|v| v.map(|score| score as f64))
                    .collect();

                let long = Aggregator::paired_long(&[
                    ("Admission", admission.as_slice()),
                    ("Discharge", discharge.as_slice()),
                ])?;
                Ok(GcsComparison { long })
            },
        )
    }

    fn injury_side_section(
        &self,
        df: &DataFrame,
    ) -> Result<Section<AggregationResult>, DashboardError> {
        gated(df, &[columns::INJURY_SIDE], |df| {
            let counts = Aggregator::value_counts(df, columns::INJURY_SIDE)?;
            Ok(AggregationResult::new(bucket_low_frequency(
                counts.entries,
                MIN_CATEGORY_COUNT,
            )))
        })
    }

    fn injury_volume_section(
        &self,
        df: &DataFrame,
    ) -> Result<Section<Vec<f64>>, DashboardError> {
        gated(df, &[columns::INJURY_VOLUME], |df| {
            Ok(Aggregator::numeric_series(df, columns::INJURY_VOLUME)?)
        })
    }

    fn midline_shift_section(
        &self,
        df: &DataFrame,
    ) -> Result<Section<AggregationResult>, DashboardError> {
        gated(df, &[columns::MIDLINE_SHIFT], |df| {
            Ok(Aggregator::top_n_normalized(
                df,
                columns::MIDLINE_SHIFT,
                usize::MAX,
                None,
            )?)
        })
    }

    fn bleed_subcategory_section(
        &self,
        df: &DataFrame,
    ) -> Result<Section<AggregationResult>, DashboardError> {
        gated(df, &[columns::BLEED_SUBCATEGORY], |df| {
            Ok(Aggregator::value_counts(df, columns::BLEED_SUBCATEGORY)?)
        })
    }

    fn top_locations_section(
        &self,
        df: &DataFrame,
    ) -> Result<Section<AggregationResult>, DashboardError> {
        gated(df, &[columns::BLEED_LOCATION], |df| {
            Ok(Aggregator::top_n_normalized(
                df,
                columns::BLEED_LOCATION,
                TOP_LOCATION_LIMIT,
                Some(NONE_SENTINEL),
            )?)
        })
    }

    fn top_pathologies_section(
        &self,
        df: &DataFrame,
    ) -> Result<Section<AggregationResult>, DashboardError> {
        gated(df, &[columns::PATHOLOGY_EXTRACTED], |df| {
            Ok(Aggregator::top_n_normalized(
                df,
                columns::PATHOLOGY_EXTRACTED,
                TOP_LOCATION_LIMIT,
                None,
            )?)
        })
    }
}

/// Run `compute` only when every required column is present; otherwise warn
/// and mark the section unavailable.
fn gated<T>(
    df: &DataFrame,
    required: &[&str],
    compute: impl FnOnce(&DataFrame) -> Result<T, DashboardError>,
) -> Result<Section<T>, DashboardError> {
    match require_columns(df, required) {
        Ok(()) => Ok(Section::Ready(compute(df)?)),
        Err(missing) => {
            tracing::warn!(?missing, "section skipped: columns not in dataset");
            Ok(Section::Unavailable { missing })
        }
    }
}
