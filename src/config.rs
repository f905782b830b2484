//! Configuration of the standard seven-step blueprint.

use crate::error::Result;
use crate::preprocessing::encoding::{CollapseRareConfig, OneHotConfig, OrdinalConfig};
use crate::preprocessing::filter::{NearZeroVarianceConfig, NzvRule};
use crate::preprocessing::scaling::{ScaleConfig, YeoJohnsonConfig};
use serde::{Deserialize, Serialize};

/// Parameters of every step of [`Blueprint::standard`](crate::Blueprint::standard).
///
/// # Example
/// ```ignore
/// use tabular_blueprint::{Blueprint, BlueprintConfig};
///
/// let config = BlueprintConfig::default()
///     .with_rare_threshold(0.02)
///     .with_ordinal_levels("Overall_Qual", ["Poor", "Fair", "Good", "Excellent"]);
/// let fitted = Blueprint::standard(&config).fit(&training, "Sale_Price")?;
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BlueprintConfig {
    pub nzv: NearZeroVarianceConfig,
    pub rare: CollapseRareConfig,
    pub ordinal: OrdinalConfig,
    pub yeo_johnson: YeoJohnsonConfig,
    pub scale: ScaleConfig,
}

impl BlueprintConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the near-zero-variance frequency ratio and unique percentage cutoffs.
    pub fn with_nzv_cuts(mut self, freq_cut: f64, unique_cut: f64) -> Self {
        self.nzv.freq_cut = freq_cut;
        self.nzv.unique_cut = unique_cut;
        self
    }

    pub fn with_nzv_rule(mut self, rule: NzvRule) -> Self {
        self.nzv.rule = rule;
        self
    }

    /// Set the relative frequency below which categories collapse.
    pub fn with_rare_threshold(mut self, threshold: f64) -> Self {
        self.rare.threshold = threshold;
        self
    }

    /// Set the fallback category label used by collapsing, ordinal and
    /// one-hot encoding.
    pub fn with_other_label(mut self, label: impl Into<String>) -> Self {
        self.rare.other_label = label.into();
        self.ordinal.other_label = self.rare.other_label.clone();
        self
    }

    pub fn with_ordinal_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.ordinal.pattern = pattern.into();
        self
    }

    /// Declare the level order of an ordinal column, lowest first.
    pub fn with_ordinal_levels<S: Into<String>>(
        mut self,
        column: impl Into<String>,
        levels: impl IntoIterator<Item = S>,
    ) -> Self {
        self.ordinal
            .declared_levels
            .insert(column.into(), levels.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_yeo_johnson(mut self, config: YeoJohnsonConfig) -> Self {
        self.yeo_johnson = config;
        self
    }

    pub fn with_ddof(mut self, ddof: usize) -> Self {
        self.scale.ddof = ddof;
        self
    }

    /// One-hot settings derived from the shared fallback label.
    pub fn one_hot(&self) -> OneHotConfig {
        OneHotConfig {
            other_label: self.rare.other_label.clone(),
        }
    }

    /// Check every parameter range.
    ///
    /// # Errors
    /// [`BlueprintError::InvalidParameter`](crate::BlueprintError::InvalidParameter)
    /// naming the first offending value.
    pub fn validate(&self) -> Result<()> {
        self.nzv.validate()?;
        self.rare.validate()?;
        self.ordinal.compile()?;
        self.yeo_johnson.validate()?;
        self.scale.validate()
    }
}
