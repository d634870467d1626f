/// Default floor applied to every "extended" table length.
///
/// Lookup tables shorter than this are padded up to it: very short tables cost
/// as much to materialize as a table of this size, so the floor amortizes the fixed
/// overhead. Deployments override it through [`crate::tables::TableConfig`].
pub const DEFAULT_MIN_TABLE_LEN: usize = 16;

/// Phase-exponential table length used for radix-2 transforms whose length is an
/// exact power of the radix.
///
/// A radix-2 table would otherwise hold only two entries; below four entries the
/// table is no longer worth storing as a lookup table at all.
pub const RADIX2_MIN_EXP_TABLE_LEN: usize = 4;
