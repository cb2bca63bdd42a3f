//! Serpentine (boustrophedonic) reordering of gridded values.
//!
//! Grids scanned boustrophedonically store every odd row (0-based) right to
//! left. This kind exposes the stored array in logical row-major order and
//! writes logical values back in stored order. Rows either all hold
//! `numberOfColumns` values or take their lengths from a per-row array `pl`.
//!
//! ```
//! use gridfield::boustrophedonic::{RowLayout, storage_to_logical};
//!
//! let storage = [1.0, 2.0, 3.0, 6.0, 5.0, 4.0];
//! let mut logical = [0.0; 6];
//! storage_to_logical(&storage, &RowLayout::uniform(2, 3), &mut logical);
//! assert_eq!(logical, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
//! ```

use log::trace;

use crate::{
    dump::Dumper,
    errors::FieldError,
    generic,
    kind::{KindDescriptor, Overrides, Slot},
    node::{FieldConfig, FieldNode, NativeType},
    structure::{Arguments, Structure},
};

pub const NAME: &str = "data_apply_boustrophedonic";

/// Names of the sibling entries the transcoder works on, in argument order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoustrophedonicConfig {
    /// Stored values.
    pub values: String,
    pub number_of_rows: String,
    pub number_of_columns: String,
    pub number_of_points: String,
    /// Per-row lengths. When absent from the structure, rows are uniform.
    pub pl: Option<String>,
}

pub fn descriptor() -> KindDescriptor {
    KindDescriptor::child_of(
        NAME,
        generic::NAME,
        Overrides {
            init: Some(Slot::Implemented(init)),
            dump: Some(Slot::Implemented(dump)),
            value_count: Some(Slot::Implemented(value_count)),
            native_type: Some(Slot::Implemented(native_type)),
            pack_double: Some(Slot::Implemented(pack_double)),
            unpack_double: Some(Slot::Implemented(unpack_double)),
            // Random access would recompute the row mapping on every call.
            unpack_double_element: Some(Slot::Unsupported),
            ..Default::default()
        },
    )
}

/// Row lengths of a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowLayout {
    /// Every row holds `columns` values.
    Uniform { rows: usize, columns: usize },
    /// Row `j` holds `lengths[j]` values.
    Variable(Vec<usize>),
}

impl RowLayout {
    pub fn uniform(rows: usize, columns: usize) -> Self {
        RowLayout::Uniform { rows, columns }
    }

    pub fn variable(lengths: Vec<usize>) -> Self {
        RowLayout::Variable(lengths)
    }

    pub fn rows(&self) -> usize {
        match self {
            RowLayout::Uniform { rows, .. } => *rows,
            RowLayout::Variable(lengths) => lengths.len(),
        }
    }

    pub fn row_len(&self, row: usize) -> usize {
        match self {
            RowLayout::Uniform { columns, .. } => *columns,
            RowLayout::Variable(lengths) => lengths[row],
        }
    }

    /// Total number of values covered by all rows, or `None` on overflow.
    pub fn covered(&self) -> Option<usize> {
        match self {
            RowLayout::Uniform { rows, columns } => rows.checked_mul(*columns),
            RowLayout::Variable(lengths) => lengths
                .iter()
                .try_fold(0usize, |acc, len| acc.checked_add(*len)),
        }
    }

    fn read(
        config: &BoustrophedonicConfig,
        structure: &dyn Structure,
    ) -> Result<Self, FieldError> {
        let rows = read_count(structure, &config.number_of_rows)?;
        let columns = read_count(structure, &config.number_of_columns)?;

        let pl = config
            .pl
            .as_deref()
            .and_then(|pl| structure.get_array_size(pl).ok().map(|size| (pl, size)));

        let Some((pl, pl_size)) = pl else {
            return Ok(RowLayout::uniform(rows, columns));
        };

        assert_eq!(
            pl_size, rows,
            "row-length array `{pl}` holds {pl_size} entries for {rows} rows"
        );

        let lengths = structure
            .get_integer_array(pl)?
            .into_iter()
            .map(|len| {
                usize::try_from(len).map_err(|_| FieldError::NegativeCount {
                    name: pl.to_string(),
                    value: len,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RowLayout::variable(lengths))
    }
}

fn copy_row_forward(src: &[f64], dst: &mut [f64]) {
    dst.copy_from_slice(src);
}

fn copy_row_reversed(src: &[f64], dst: &mut [f64]) {
    for (d, s) in dst.iter_mut().zip(src.iter().rev()) {
        *d = *s;
    }
}

/// Walks the rows, copying even rows as-is and odd rows reversed. Reversing a
/// row twice restores it, so one walk serves both directions.
fn serpentine(src: &[f64], layout: &RowLayout, dst: &mut [f64]) {
    assert_eq!(src.len(), dst.len(), "source and target lengths differ");
    assert_eq!(
        layout.covered(),
        Some(src.len()),
        "rows do not cover the buffer"
    );

    let mut cursor = 0;
    for row in 0..layout.rows() {
        let end = cursor + layout.row_len(row);
        if row % 2 == 1 {
            copy_row_reversed(&src[cursor..end], &mut dst[cursor..end]);
        } else {
            copy_row_forward(&src[cursor..end], &mut dst[cursor..end]);
        }
        cursor = end;
    }
}

/// Reorders stored values into logical row-major order.
///
/// # Panics
///
/// If `storage`, `logical` and the rows of `layout` do not all cover the same
/// number of values.
pub fn storage_to_logical(storage: &[f64], layout: &RowLayout, logical: &mut [f64]) {
    serpentine(storage, layout, logical);
}

/// Reorders logical row-major values into stored order.
///
/// # Panics
///
/// Under the same conditions as [storage_to_logical].
pub fn logical_to_storage(logical: &[f64], layout: &RowLayout, storage: &mut [f64]) {
    serpentine(logical, layout, storage);
}

fn init(node: &mut FieldNode, _: &dyn Structure, args: &Arguments) -> Result<(), FieldError> {
    let config = BoustrophedonicConfig {
        values: args.name(0)?.to_string(),
        number_of_rows: args.name(1)?.to_string(),
        number_of_columns: args.name(2)?.to_string(),
        number_of_points: args.name(3)?.to_string(),
        pl: args.optional_name(4).map(str::to_string),
    };

    node.set_config(FieldConfig::Boustrophedonic(config));
    node.set_length(0);
    Ok(())
}

fn config(node: &FieldNode) -> Result<&BoustrophedonicConfig, FieldError> {
    match node.config() {
        FieldConfig::Boustrophedonic(config) => Ok(config),
        _ => Err(node.missing_configuration()),
    }
}

fn read_count(structure: &dyn Structure, name: &str) -> Result<usize, FieldError> {
    let value = structure.get_integer(name)?;
    usize::try_from(value).map_err(|_| FieldError::NegativeCount {
        name: name.to_string(),
        value,
    })
}

fn check_coverage(
    config: &BoustrophedonicConfig,
    layout: &RowLayout,
    number_of_points: usize,
) -> Result<(), FieldError> {
    match layout.covered() {
        Some(covered) if covered == number_of_points => Ok(()),
        Some(covered) => Err(FieldError::GridMismatch {
            count_name: config.number_of_points.clone(),
            count: number_of_points,
            covered,
        }),
        None => Err(FieldError::RowOverflow {
            count_name: config.number_of_points.clone(),
            count: number_of_points,
        }),
    }
}

fn value_count(node: &FieldNode, structure: &dyn Structure) -> i64 {
    let Ok(config) = config(node) else {
        return 0;
    };

    match structure.get_integer(&config.number_of_points) {
        Ok(count) => count,
        Err(err) => {
            trace!("`{}`: no point count ({err}), reporting 0 values", node.name());
            0
        }
    }
}

fn native_type(_: &FieldNode) -> NativeType {
    NativeType::Double
}

fn unpack_double(
    node: &FieldNode,
    structure: &dyn Structure,
    out: &mut [f64],
) -> Result<usize, FieldError> {
    let config = config(node)?;

    let number_of_points = read_count(structure, &config.number_of_points)?;
    if out.len() < number_of_points {
        return Err(FieldError::BufferTooSmall {
            required: number_of_points,
            provided: out.len(),
        });
    }

    let values_size = structure.get_array_size(&config.values)?;
    if values_size == 0 {
        trace!("`{}`: constant field, nothing to reorder", node.name());
        return Ok(0);
    }

    let decoding_error = |actual| FieldError::Decoding {
        count_name: config.number_of_points.clone(),
        count: number_of_points,
        values_name: config.values.clone(),
        actual,
    };

    if values_size != number_of_points {
        return Err(decoding_error(values_size));
    }

    let storage = structure.get_numeric_array(&config.values)?;
    if storage.len() != number_of_points {
        return Err(decoding_error(storage.len()));
    }

    let layout = RowLayout::read(config, structure)?;
    check_coverage(config, &layout, number_of_points)?;

    trace!(
        "`{}`: unpacking {number_of_points} values over {} rows",
        node.name(),
        layout.rows()
    );
    storage_to_logical(&storage, &layout, &mut out[..number_of_points]);
    Ok(number_of_points)
}

fn pack_double(
    node: &FieldNode,
    structure: &mut dyn Structure,
    values: &[f64],
) -> Result<(), FieldError> {
    let config = config(node)?;

    let number_of_points = read_count(structure, &config.number_of_points)?;
    if values.len() < number_of_points {
        return Err(FieldError::BufferTooSmall {
            required: number_of_points,
            provided: values.len(),
        });
    }

    let layout = RowLayout::read(config, structure)?;
    check_coverage(config, &layout, number_of_points)?;

    trace!(
        "`{}`: packing {number_of_points} values over {} rows",
        node.name(),
        layout.rows()
    );
    let mut storage = vec![0.0; number_of_points];
    logical_to_storage(&values[..number_of_points], &layout, &mut storage);

    structure.set_numeric_array(&config.values, storage)?;
    Ok(())
}

fn dump(
    node: &FieldNode,
    structure: &dyn Structure,
    dumper: &mut dyn Dumper,
) -> Result<(), FieldError> {
    let values = node.unpack_double_vec(structure)?;
    dumper.dump_values(node, &values);
    Ok(())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{
        dump::TextDumper,
        errors::StructureError,
        kind::{KindRegistry, Operation},
        structure::{Argument, Entry, Message},
    };

    fn node() -> FieldNode {
        let args: Arguments = ["codedValues", "Nj", "Ni", "numberOfPoints", "pl"]
            .into_iter()
            .collect();
        let kind = KindRegistry::builtin().get(NAME).unwrap();
        FieldNode::create("values", kind, 0, 0, &Message::new(), &args).unwrap()
    }

    fn grid(rows: i64, columns: i64, storage: Vec<f64>) -> Message {
        Message::new()
            .with_long("Nj", rows)
            .with_long("Ni", columns)
            .with_long("numberOfPoints", storage.len() as i64)
            .with_doubles("codedValues", storage)
    }

    fn floats(values: &[i32]) -> Vec<f64> {
        values.iter().map(|v| *v as f64).collect()
    }

    #[test]
    fn test_unpack_uniform_grid() {
        let message = grid(4, 3, floats(&[1, 2, 3, 6, 5, 4, 7, 8, 9, 12, 11, 10]));
        let mut out = vec![0.0; 12];

        assert_eq!(node().unpack_double(&message, &mut out), Ok(12));
        assert_eq!(out, floats(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]));
    }

    #[test]
    fn test_unpack_variable_rows() {
        let message = grid(3, 0, floats(&[1, 2, 5, 4, 3, 6, 7])).with_longs("pl", vec![2, 3, 2]);
        let mut out = vec![0.0; 7];

        assert_eq!(node().unpack_double(&message, &mut out), Ok(7));
        assert_eq!(out, floats(&[1, 2, 3, 4, 5, 6, 7]));
    }

    #[test]
    fn test_unpack_into_larger_buffer() {
        let message = grid(2, 2, floats(&[1, 2, 4, 3]));
        let mut out = vec![-1.0; 6];

        assert_eq!(node().unpack_double(&message, &mut out), Ok(4));
        assert_eq!(out, vec![1.0, 2.0, 3.0, 4.0, -1.0, -1.0]);
    }

    #[test]
    fn test_constant_field_leaves_output_untouched() {
        let message = grid(2, 2, vec![]).with_long("numberOfPoints", 4);
        let mut out = vec![9.0; 4];

        assert_eq!(node().unpack_double(&message, &mut out), Ok(0));
        assert_eq!(out, vec![9.0; 4]);
    }

    #[test]
    fn test_constant_field_has_no_values() {
        let message = grid(2, 2, vec![]).with_long("numberOfPoints", 4);
        assert_eq!(node().unpack_double_vec(&message), Ok(vec![]));

        let mut dumper = TextDumper::new();
        node().dump(&message, &mut dumper).unwrap();
        assert_eq!(
            dumper.into_string(),
            "values (data_apply_boustrophedonic) @0+0 = []\n"
        );
    }

    #[test]
    fn test_size_mismatch_is_decoding_error() {
        let message = grid(2, 2, floats(&[1, 2, 3])).with_long("numberOfPoints", 4);
        let mut out = vec![0.0; 4];

        let err = node().unpack_double(&message, &mut out).unwrap_err();
        assert_eq!(
            err,
            FieldError::Decoding {
                count_name: "numberOfPoints".to_string(),
                count: 4,
                values_name: "codedValues".to_string(),
                actual: 3,
            }
        );
        assert_eq!(
            err.to_string(),
            "boustrophedonic ordering error: (numberOfPoints=4) != (sizeOf(codedValues)=3)"
        );
        assert_eq!(out, vec![0.0; 4]);
    }

    #[test]
    fn test_unpack_buffer_too_small_writes_nothing() {
        let message = grid(2, 2, floats(&[1, 2, 4, 3]));
        let mut out = vec![0.0; 3];

        assert_eq!(
            node().unpack_double(&message, &mut out),
            Err(FieldError::BufferTooSmall {
                required: 4,
                provided: 3
            })
        );
        assert_eq!(out, vec![0.0; 3]);
    }

    #[test]
    fn test_pack_buffer_too_small_leaves_structure() {
        let mut message = grid(2, 2, floats(&[1, 2, 4, 3]));
        let before = message.clone();

        assert_eq!(
            node().pack_double(&mut message, &[1.0, 2.0]),
            Err(FieldError::BufferTooSmall {
                required: 4,
                provided: 2
            })
        );
        assert_eq!(message, before);
    }

    #[test]
    fn test_pack_uniform_grid() {
        let mut message = grid(4, 3, vec![0.0; 12]);

        node()
            .pack_double(&mut message, &floats(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]))
            .unwrap();
        assert_eq!(
            message.get("codedValues"),
            Some(&Entry::DoubleArray(floats(&[
                1, 2, 3, 6, 5, 4, 7, 8, 9, 12, 11, 10
            ])))
        );
    }

    #[test]
    fn test_pack_replaces_stored_size() {
        // A constant field has no stored values yet; packing fills them in.
        let mut message = grid(2, 3, vec![]).with_long("numberOfPoints", 6);

        node()
            .pack_double(&mut message, &floats(&[1, 2, 3, 4, 5, 6]))
            .unwrap();
        assert_eq!(
            message.get("codedValues"),
            Some(&Entry::DoubleArray(floats(&[1, 2, 3, 6, 5, 4])))
        );
    }

    #[test]
    fn test_pack_variable_rows() {
        let mut message = grid(3, 0, vec![0.0; 7]).with_longs("pl", vec![2, 3, 2]);

        node()
            .pack_double(&mut message, &floats(&[1, 2, 3, 4, 5, 6, 7]))
            .unwrap();
        assert_eq!(
            message.get("codedValues"),
            Some(&Entry::DoubleArray(floats(&[1, 2, 5, 4, 3, 6, 7])))
        );
    }

    #[test]
    fn test_zero_rows() {
        let message = grid(0, 5, vec![]).with_long("numberOfPoints", 0);
        let mut out: Vec<f64> = vec![];
        assert_eq!(node().unpack_double(&message, &mut out), Ok(0));

        let mut message = grid(0, 5, vec![1.0]).with_long("numberOfPoints", 0);
        assert!(matches!(
            node().unpack_double(&message, &mut out),
            Err(FieldError::Decoding { .. })
        ));
        assert_eq!(node().pack_double(&mut message, &[]), Ok(()));
        assert_eq!(message.get("codedValues"), Some(&Entry::DoubleArray(vec![])));
    }

    #[test]
    fn test_zero_length_row() {
        let message = grid(4, 0, floats(&[1, 2, 3, 4, 5, 7, 6])).with_longs("pl", vec![2, 0, 3, 2]);
        let mut out = vec![0.0; 7];

        assert_eq!(node().unpack_double(&message, &mut out), Ok(7));
        assert_eq!(out, floats(&[1, 2, 3, 4, 5, 6, 7]));
    }

    #[test]
    fn test_missing_pl_entry_means_uniform() {
        let message = grid(2, 2, floats(&[1, 2, 4, 3]));
        assert!(message.get("pl").is_none());

        let mut out = vec![0.0; 4];
        node().unpack_double(&message, &mut out).unwrap();
        assert_eq!(out, floats(&[1, 2, 3, 4]));
    }

    #[test]
    fn test_without_pl_argument() {
        let args: Arguments = ["codedValues", "Nj", "Ni", "numberOfPoints"]
            .into_iter()
            .collect();
        let kind = KindRegistry::builtin().get(NAME).unwrap();
        let node = FieldNode::create("values", kind, 0, 0, &Message::new(), &args).unwrap();

        let FieldConfig::Boustrophedonic(config) = node.config() else {
            panic!("expected boustrophedonic configuration");
        };
        assert_eq!(config.pl, None);

        // Even a stray `pl` entry is ignored when not named.
        let message = grid(2, 2, floats(&[1, 2, 4, 3])).with_longs("pl", vec![1, 3]);
        let mut out = vec![0.0; 4];
        node.unpack_double(&message, &mut out).unwrap();
        assert_eq!(out, floats(&[1, 2, 3, 4]));
    }

    #[test]
    #[should_panic(expected = "row-length array `pl` holds 2 entries for 3 rows")]
    fn test_pl_length_must_match_rows() {
        let message = grid(3, 0, floats(&[1, 2, 3, 4])).with_longs("pl", vec![2, 2]);
        let mut out = vec![0.0; 4];
        let _ = node().unpack_double(&message, &mut out);
    }

    #[test]
    #[should_panic(expected = "row-length array `pl` holds 2 entries for 3 rows")]
    fn test_pack_pl_length_must_match_rows() {
        let mut message = grid(3, 0, vec![])
            .with_long("numberOfPoints", 4)
            .with_longs("pl", vec![2, 2]);
        let _ = node().pack_double(&mut message, &floats(&[1, 2, 3, 4]));
    }

    #[test]
    fn test_pack_pl_mismatch_leaves_structure() {
        let mut message = grid(3, 0, vec![]).with_longs("pl", vec![2, 2]);
        let before = message.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            node().pack_double(&mut message, &floats(&[1, 2, 3, 4]))
        }));
        assert!(result.is_err());
        assert_eq!(message, before);
    }

    #[test]
    fn test_row_overflow() {
        let message = grid(i64::MAX, 3, floats(&[1, 2, 3, 4]));
        let mut out = vec![0.0; 4];

        let err = node().unpack_double(&message, &mut out).unwrap_err();
        assert_eq!(
            err,
            FieldError::RowOverflow {
                count_name: "numberOfPoints".to_string(),
                count: 4,
            }
        );
        assert_eq!(
            err.to_string(),
            "row lengths overflow while covering numberOfPoints=4"
        );
        assert_eq!(out, vec![0.0; 4]);
    }

    #[test]
    fn test_rows_must_cover_points() {
        let message = grid(2, 3, floats(&[1, 2, 3, 4]));
        let mut out = vec![0.0; 4];

        assert_eq!(
            node().unpack_double(&message, &mut out),
            Err(FieldError::GridMismatch {
                count_name: "numberOfPoints".to_string(),
                count: 4,
                covered: 6,
            })
        );
        assert_eq!(out, vec![0.0; 4]);
    }

    #[test]
    fn test_negative_counts() {
        let mut message = grid(-2, 2, vec![]).with_long("numberOfPoints", 0);
        assert_eq!(
            node().pack_double(&mut message, &[]),
            Err(FieldError::NegativeCount {
                name: "Nj".to_string(),
                value: -2,
            })
        );

        let message = grid(2, 0, floats(&[1, 2])).with_longs("pl", vec![3, -1]);
        let mut out = vec![0.0; 2];
        assert!(matches!(
            node().unpack_double(&message, &mut out),
            Err(FieldError::NegativeCount { value: -1, .. })
        ));
    }

    #[test]
    fn test_missing_sibling_propagates() {
        let message = Message::new().with_long("numberOfPoints", 4);
        let mut out = vec![0.0; 4];
        assert_eq!(
            node().unpack_double(&message, &mut out),
            Err(FieldError::ConfigurationRead(StructureError::NotFound(
                "codedValues".to_string()
            )))
        );
    }

    #[test]
    fn test_unpack_element_not_implemented() {
        let message = grid(2, 2, floats(&[1, 2, 4, 3]));
        assert_eq!(
            node().unpack_double_element(&message, 0),
            Err(FieldError::NotImplemented {
                kind: NAME.to_string(),
                operation: Operation::UnpackDoubleElement,
            })
        );
    }

    #[test]
    fn test_value_count() {
        let message = grid(2, 2, floats(&[1, 2, 4, 3]));
        assert_eq!(node().value_count(&message), 4);
        assert_eq!(node().value_count(&Message::new()), 0);

        let message = Message::new().with_doubles("numberOfPoints", vec![1.0]);
        assert_eq!(node().value_count(&message), 0);
    }

    #[test]
    fn test_native_type_and_length() {
        let node = node();
        assert_eq!(node.native_type(), NativeType::Double);
        assert_eq!(node.length(), 0);
    }

    #[test]
    fn test_init_requires_four_names() {
        let args = Arguments::new(vec![
            Argument::from("codedValues"),
            Argument::from("Nj"),
            Argument::from("Ni"),
        ]);
        let kind = KindRegistry::builtin().get(NAME).unwrap();
        let err = FieldNode::create("values", kind, 0, 0, &Message::new(), &args).unwrap_err();
        assert_eq!(
            err,
            FieldError::ConfigurationRead(StructureError::MissingArgument(3))
        );
    }

    #[test]
    fn test_unconfigured_node() {
        let kind = KindRegistry::builtin().get(NAME).unwrap();
        let node = FieldNode::new("values", kind, 0, 0);
        assert_eq!(
            node.unpack_double(&Message::new(), &mut []),
            Err(FieldError::MissingConfiguration {
                kind: NAME.to_string()
            })
        );
    }

    #[test]
    fn test_dump_logical_values() {
        let message = grid(2, 2, floats(&[1, 2, 4, 3]));
        let mut dumper = TextDumper::new();
        node().dump(&message, &mut dumper).unwrap();
        assert_eq!(
            dumper.as_str(),
            "values (data_apply_boustrophedonic) @0+0 = [1, 2, 3, 4]\n"
        );
    }

    fn uniform_grid() -> impl Strategy<Value = (usize, usize, Vec<f64>)> {
        (0usize..8, 0usize..8).prop_flat_map(|(rows, columns)| {
            (
                Just(rows),
                Just(columns),
                prop::collection::vec(-1.0e6f64..1.0e6, rows * columns),
            )
        })
    }

    fn variable_grid() -> impl Strategy<Value = (Vec<usize>, Vec<f64>)> {
        prop::collection::vec(0usize..6, 0..8).prop_flat_map(|pl| {
            let total = pl.iter().sum::<usize>();
            (Just(pl), prop::collection::vec(-1.0e6f64..1.0e6, total))
        })
    }

    proptest! {
        #[test]
        fn uniform_round_trip((rows, columns, values) in uniform_grid()) {
            let node = node();

            let mut message = grid(rows as i64, columns as i64, values.clone());
            let mut logical = vec![0.0; values.len()];
            node.unpack_double(&message, &mut logical).unwrap();
            node.pack_double(&mut message, &logical).unwrap();
            prop_assert_eq!(message.get("codedValues"), Some(&Entry::DoubleArray(values.clone())));

            let mut message = grid(rows as i64, columns as i64, vec![0.0; values.len()]);
            node.pack_double(&mut message, &values).unwrap();
            let mut unpacked = vec![0.0; values.len()];
            node.unpack_double(&message, &mut unpacked).unwrap();
            prop_assert_eq!(unpacked, values);
        }

        #[test]
        fn variable_round_trip((pl, values) in variable_grid()) {
            let node = node();
            let layout = RowLayout::variable(pl.clone());
            let mut message = grid(pl.len() as i64, 0, values.clone())
                .with_longs("pl", pl.iter().map(|len| *len as i64).collect());

            let mut logical = vec![0.0; values.len()];
            node.unpack_double(&message, &mut logical).unwrap();

            let mut expected = vec![0.0; values.len()];
            storage_to_logical(&values, &layout, &mut expected);
            prop_assert_eq!(&logical, &expected);

            node.pack_double(&mut message, &logical).unwrap();
            prop_assert_eq!(message.get("codedValues"), Some(&Entry::DoubleArray(values)));
        }

        #[test]
        fn even_rows_are_untouched((rows, columns, values) in uniform_grid()) {
            let mut logical = vec![0.0; values.len()];
            storage_to_logical(&values, &RowLayout::uniform(rows, columns), &mut logical);
            for row in (0..rows).step_by(2) {
                let span = row * columns..(row + 1) * columns;
                prop_assert_eq!(&logical[span.clone()], &values[span]);
            }
        }
    }
}
