//! Dataset inspection
//!
//! Human-readable summaries of a loaded dataset and of how its variables were
//! classified, printed when the tool runs verbosely.

use crate::classifier::Classification;
use crate::dataset::Dataset;

/// Structured description of one variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableSummary {
    pub name: String,
    pub data_type: String,
    pub dimensions: Vec<String>,
    pub shape: Vec<usize>,
    pub is_coordinate: bool,
}

/// Describe every variable of `dataset`, in dataset order.
pub fn summarize_variables(dataset: &Dataset) -> Vec<VariableSummary> {
    dataset
        .variables()
        .iter()
        .map(|var| VariableSummary {
            name: var.name().to_string(),
            data_type: var.data().type_name().to_string(),
            dimensions: var.dimensions().to_vec(),
            shape: var.shape().to_vec(),
            is_coordinate: var.is_coordinate(),
        })
        .collect()
}

/// Prints global attributes, dimensions and variables of a dataset.
pub fn print_dataset_summary(dataset: &Dataset) {
    println!("\n===== Global Attributes =====");
    for (name, value) in dataset.attributes() {
        println!("- {}: {:?}", name, value);
    }

    println!("\n===== Dimensions =====");
    if dataset.dimensions().is_empty() {
        println!("   (No dimensions found)");
    }
    for dim in dataset.dimensions() {
        let length_info = if dim.is_unlimited {
            format!("{} (unlimited)", dim.len)
        } else {
            dim.len.to_string()
        };
        println!("    {} = {}", dim.name, length_info);
    }

    println!("\n===== Variables =====");
    for summary in summarize_variables(dataset) {
        let kind = if summary.is_coordinate { " [coordinate]" } else { "" };
        if summary.dimensions.is_empty() {
            println!("    {} ({}): scalar{}", summary.name, summary.data_type, kind);
        } else {
            let shape: Vec<String> = summary.shape.iter().map(|s| s.to_string()).collect();
            println!(
                "    {} ({}): [{}] = ({}){}",
                summary.name,
                summary.data_type,
                summary.dimensions.join(", "),
                shape.join(" × "),
                kind
            );
        }
    }
}

/// Prints which variables become series and which are carried as metadata.
pub fn print_classification(classification: &Classification) {
    println!("\n===== Classification =====");
    if classification.has_no_series() {
        println!("   time-dependent:   (none, no series will be written)");
    } else {
        println!(
            "   time-dependent:   {}",
            classification.time_dependent.join(", ")
        );
    }
    println!(
        "   time-independent: {}",
        classification.time_independent.join(", ")
    );
}
