// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use thiserror::Error;
#[derive(Error, Debug)]
pub enum DesignError {
    #[error("Data profiling error: {0}")]
    Data(#[from] DataError),
    #[error("Colour error: {0}")]
    Colour(#[from] ColourError),
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),
    #[error("Model analysis error: {0}")]
    Model(#[from] ModelError),
    #[error("Serialisation error: {source}")]
    Serialisation {
        #[from]
        source: serde_json::Error,
    },
}
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Empty dataset provided for profiling")]
    EmptyDataset,
    #[error("Failed to profile column '{column}': {reason}")]
    ColumnProfilingError { column: String, reason: String },
    #[error("Failed to calculate statistics for column '{column}': {source}")]
    StatisticsError {
        column: String,
        #[source]
        source: polars::error::PolarsError,
    },
}
#[derive(Error, Debug)]
pub enum ColourError {
    #[error("Invalid colour format: '{input}' is not a hex triplet")]
    InvalidColourFormat { input: String },
    #[error("Palette '{name}' contains no colours")]
    EmptyPalette { name: String },
}
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Invalid canvas dimensions: {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },
}
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model metadata contains no tables")]
    EmptyModel,
}
pub type Result<T> = std::result::Result<T, DesignError>;
pub type DataResult<T> = std::result::Result<T, DataError>;
pub type ColourResult<T> = std::result::Result<T, ColourError>;
pub type LayoutResult<T> = std::result::Result<T, LayoutError>;
pub type ModelResult<T> = std::result::Result<T, ModelError>;
impl DesignError {
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DesignError::Colour(ColourError::InvalidColourFormat { .. })
                | DesignError::Layout(LayoutError::InvalidCanvas { .. })
        )
    }
    pub fn category(&self) -> &'static str {
        match self {
            DesignError::Data(_) => "Data",
            DesignError::Colour(_) => "Colour",
            DesignError::Layout(_) => "Layout",
            DesignError::Model(_) => "Model",
            DesignError::Serialisation { .. } => "Serialisation",
        }
    }
    pub fn user_message(&self) -> String {
        match self {
            DesignError::Data(DataError::EmptyDataset) => {
                "The dataset appears to be empty. Please provide data with at least one row and one column.".to_string()
            }
            DesignError::Colour(ColourError::InvalidColourFormat { input }) => {
                format!("'{input}' is not a recognised colour. Use a hex value such as #1E88E5.")
            }
            DesignError::Model(ModelError::EmptyModel) => {
                "The model metadata contains no tables to analyse.".to_string()
            }
            _ => self.to_string(),
        }
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}
impl ErrorSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorSeverity::Info => "INFO",
            ErrorSeverity::Warning => "WARNING",
            ErrorSeverity::Error => "ERROR",
            ErrorSeverity::Critical => "CRITICAL",
        }
    }
    pub fn colour_code(&self) -> &'static str {
        match self {
            ErrorSeverity::Info => "\x1b[36m",
            ErrorSeverity::Warning => "\x1b[33m",
            ErrorSeverity::Error => "\x1b[31m",
            ErrorSeverity::Critical => "\x1b[35m",
        }
    }
}
pub mod utils {
    use super::*;
    pub fn invalid_colour(input: &str) -> ColourError {
        ColourError::InvalidColourFormat {
            input: input.to_string(),
        }
    }
    pub fn column_failure(column: &str, reason: impl std::fmt::Display) -> DataError {
        DataError::ColumnProfilingError {
            column: column.to_string(),
            reason: reason.to_string(),
        }
    }
    pub fn error_severity(error: &DesignError) -> ErrorSeverity {
        match error {
            DesignError::Colour(ColourError::InvalidColourFormat { .. }) => ErrorSeverity::Warning,
            DesignError::Layout(_) => ErrorSeverity::Warning,
            DesignError::Data(DataError::EmptyDataset) => ErrorSeverity::Error,
            DesignError::Data(_) => ErrorSeverity::Error,
            DesignError::Model(_) => ErrorSeverity::Error,
            DesignError::Colour(_) => ErrorSeverity::Error,
            DesignError::Serialisation { .. } => ErrorSeverity::Critical,
        }
    }
}
pub struct ErrorReporter {
    pub show_category: bool,
    pub coloured_output: bool,
}
impl ErrorReporter {
    pub fn new() -> Self {
        Self {
            show_category: true,
            coloured_output: true,
        }
    }
    pub fn report(&self, error: &DesignError) -> String {
        let severity = utils::error_severity(error);
        let mut output = String::new();
        if self.coloured_output {
            output.push_str(severity.colour_code());
        }
        output.push_str(&format!("[{}] {}\n", severity.as_str(), error));
        if self.coloured_output {
            output.push_str("\x1b[0m");
        }
        if self.show_category {
            output.push_str(&format!("Category: {}\n", error.category()));
        }
        tracing::debug!(category = error.category(), severity = severity.as_str(), "reported design error");
        output
    }
}
impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}
