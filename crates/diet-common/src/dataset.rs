/// Recipe dataset loaded from the pre-cleaned recipes CSV.
///
/// The file is parsed with arrow-csv into `RecordBatch`es and flattened into
/// `RecipeRecord`s once at startup. The dataset is immutable afterwards and is shared
/// read-only (behind an `Arc`) by every request.
///
/// Required columns:
/// - Name, RecipeCategory, RecipeInstructions: Utf8
/// - the eleven feature columns in `FEATURE_COLUMNS`: numeric (Boolean accepted, read as 0/1)
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use arrow_array::{Array, BooleanArray, Float64Array, RecordBatch, StringArray};
use arrow_csv::reader::Format;
use arrow_csv::ReaderBuilder;
use arrow_schema::{DataType, Field, Schema};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::error::CommonError;

pub const NAME_COLUMN: &str = "Name";
pub const CATEGORY_COLUMN: &str = "RecipeCategory";
pub const INSTRUCTIONS_COLUMN: &str = "RecipeInstructions";

/// Number of numeric features compared by the similarity indexes.
pub const FEATURE_COUNT: usize = 11;

/// Feature columns, in the positional order used for distance computation.
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "Calories",
    "FatContent",
    "SaturatedFatContent",
    "CholesterolContent",
    "SodiumContent",
    "CarbohydrateContent",
    "FiberContent",
    "SugarContent",
    "ProteinContent",
    "Time_middle",
    "Time_short",
];

const TEXT_COLUMNS: [&str; 3] = [NAME_COLUMN, CATEGORY_COLUMN, INSTRUCTIONS_COLUMN];

/// A feature row in `FEATURE_COLUMNS` order.
pub type FeatureVector = [f64; FEATURE_COUNT];

/// A single recipe row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeRecord {
    /// Recipe title, e.g. "Low-Fat Berry Blue Frozen Dessert"
    pub name: String,
    /// Category label, e.g. "breakfast", "chicken", "fish_and_seafood"
    pub category: String,
    /// Serialized instruction list as stored in the dataset, e.g. `c("Mix.", "Bake.")`
    pub instructions: String,
    /// Nutrient and time features in `FEATURE_COLUMNS` order
    pub features: FeatureVector,
}

impl RecipeRecord {
    pub fn calories(&self) -> f64 {
        self.features[0]
    }
}

/// The full, immutable recipe dataset.
#[derive(Debug)]
pub struct RecipeDataset {
    recipes: Vec<RecipeRecord>,
    fingerprint: String,
}

impl RecipeDataset {
    /// Load and validate the dataset from a CSV file on disk.
    pub fn load(path: &Path) -> Result<Arc<Self>, CommonError> {
        let bytes = std::fs::read(path)?;
        let dataset = Self::from_csv_bytes(&bytes)?;
        info!(
            path = %path.display(),
            recipes = dataset.len(),
            sha256 = %dataset.fingerprint,
            "recipe dataset loaded"
        );
        if dataset.is_empty() {
            warn!("recipe dataset has no rows, every recommendation will fail");
        }
        Ok(Arc::new(dataset))
    }

    /// Parse a CSV document (with header row) into a dataset.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self, CommonError> {
        let format = Format::default().with_header(true);
        let (inferred, _) = format.infer_schema(Cursor::new(bytes), None)?;
        let schema = Arc::new(coerce_schema(&inferred)?);

        let reader = ReaderBuilder::new(schema)
            .with_format(format)
            .build(Cursor::new(bytes))?;

        let mut recipes = Vec::new();
        for batch in reader {
            extract_recipes(&batch?, &mut recipes)?;
        }

        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let fingerprint = format!("{:x}", hasher.finalize());

        Ok(Self {
            recipes,
            fingerprint,
        })
    }

    /// Build a dataset from already-parsed records.
    ///
    /// The fingerprint is computed over the record contents so that two identical
    /// record lists share a fingerprint.
    pub fn from_records(recipes: Vec<RecipeRecord>) -> Self {
        let mut hasher = Sha256::new();
        for recipe in &recipes {
            hasher.update(recipe.name.as_bytes());
            hasher.update(b"|");
            hasher.update(recipe.category.as_bytes());
            hasher.update(b"|");
            hasher.update(recipe.instructions.as_bytes());
            for value in recipe.features {
                hasher.update(value.to_le_bytes());
            }
        }
        let fingerprint = format!("{:x}", hasher.finalize());
        Self {
            recipes,
            fingerprint,
        }
    }

    pub fn recipes(&self) -> &[RecipeRecord] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Hex-encoded SHA-256 of the source data.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// Check the inferred schema for required columns and pin their types.
///
/// Feature columns are read as Float64 (or kept Boolean), the text columns and every
/// unrelated column as Utf8.
fn coerce_schema(inferred: &Schema) -> Result<Schema, CommonError> {
    for name in TEXT_COLUMNS.iter().chain(FEATURE_COLUMNS.iter()) {
        if inferred.index_of(name).is_err() {
            return Err(CommonError::Schema(format!("missing required column: {name}")));
        }
    }

    let fields: Vec<Field> = inferred
        .fields()
        .iter()
        .map(|field| {
            let name = field.name();
            if !FEATURE_COLUMNS.iter().any(|column| column == name) {
                return Ok(Field::new(name, DataType::Utf8, true));
            }
            match field.data_type() {
                DataType::Boolean => Ok(Field::new(name, DataType::Boolean, true)),
                DataType::Int64 | DataType::Float64 | DataType::Null => {
                    Ok(Field::new(name, DataType::Float64, true))
                }
                other => Err(CommonError::Schema(format!(
                    "column {name} must be numeric, found {other}"
                ))),
            }
        })
        .collect::<Result<_, _>>()?;

    Ok(Schema::new(fields))
}

fn extract_recipes(batch: &RecordBatch, out: &mut Vec<RecipeRecord>) -> Result<(), CommonError> {
    let names = string_column(batch, NAME_COLUMN)?;
    let categories = string_column(batch, CATEGORY_COLUMN)?;
    let instructions = string_column(batch, INSTRUCTIONS_COLUMN)?;
    let features = FEATURE_COLUMNS
        .iter()
        .map(|&name| numeric_column(batch, name))
        .collect::<Result<Vec<_>, _>>()?;

    let offset = out.len();
    for row in 0..batch.num_rows() {
        let mut vector = [0.0; FEATURE_COUNT];
        for (slot, column) in vector.iter_mut().zip(&features) {
            *slot = column.value(row).ok_or_else(|| {
                CommonError::Schema(format!(
                    "null value in column {} at row {}",
                    column.name,
                    offset + row
                ))
            })?;
        }

        out.push(RecipeRecord {
            name: required_text(names, NAME_COLUMN, offset + row, row)?,
            category: required_text(categories, CATEGORY_COLUMN, offset + row, row)?,
            instructions: required_text(instructions, INSTRUCTIONS_COLUMN, offset + row, row)?,
            features: vector,
        });
    }
    Ok(())
}

fn required_text(
    column: &StringArray,
    name: &str,
    absolute_row: usize,
    row: usize,
) -> Result<String, CommonError> {
    if column.is_null(row) {
        return Err(CommonError::Schema(format!(
            "null value in column {name} at row {absolute_row}"
        )));
    }
    Ok(column.value(row).to_string())
}

/// A feature column that is either Float64 or Boolean in the parsed batch.
struct NumericColumn<'a> {
    name: &'static str,
    values: NumericValues<'a>,
}

enum NumericValues<'a> {
    Float(&'a Float64Array),
    Bool(&'a BooleanArray),
}

impl NumericColumn<'_> {
    fn value(&self, row: usize) -> Option<f64> {
        match self.values {
            NumericValues::Float(array) => (!array.is_null(row)).then(|| array.value(row)),
            NumericValues::Bool(array) => {
                (!array.is_null(row)).then(|| if array.value(row) { 1.0 } else { 0.0 })
            }
        }
    }
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray, CommonError> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| CommonError::Schema(format!("missing required column: {name}")))?;
    batch
        .column(idx)
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| CommonError::Schema(format!("column {name} is not Utf8")))
}

fn numeric_column<'a>(
    batch: &'a RecordBatch,
    name: &'static str,
) -> Result<NumericColumn<'a>, CommonError> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| CommonError::Schema(format!("missing required column: {name}")))?;
    let column = batch.column(idx).as_any();
    let values = if let Some(array) = column.downcast_ref::<Float64Array>() {
        NumericValues::Float(array)
    } else if let Some(array) = column.downcast_ref::<BooleanArray>() {
        NumericValues::Bool(array)
    } else {
        return Err(CommonError::Schema(format!("column {name} is not numeric")));
    };
    Ok(NumericColumn { name, values })
}
