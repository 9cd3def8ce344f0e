//! The hint table itself (spec §6), implemented as one pass over a [`HintBag`].

use storagewin_backing::{AccessPattern, OpenMode, SplitOrder};

use crate::descriptor::{PlacementDescriptor, StorageDescriptor};
use crate::error::{Error, Result};
use crate::hintbag::HintBag;

/// Default POSIX file mode when `file_perm` is absent: owner read+write.
const DEFAULT_FILE_MODE: u32 = 0o600;

/// Resolves a hint bag into a [`PlacementDescriptor`], exactly per the table
/// in spec §6. Unrecognized keys have no effect.
pub fn resolve(bag: &HintBag) -> Result<PlacementDescriptor> {
    match bag.get("alloc_type").unwrap_or("memory") {
        "memory" => Ok(PlacementDescriptor::Ram),
        "storage" => resolve_storage(bag).map(PlacementDescriptor::Storage),
        other => Err(Error::Malformed {
            key: "alloc_type",
            value: other.to_string(),
        }),
    }
}

fn resolve_storage(bag: &HintBag) -> Result<StorageDescriptor> {
    let filename = bag
        .get("storage_alloc_filename")
        .ok_or(Error::MissingFilename)?
        .to_string();

    let offset = parse_opt(bag, "storage_alloc_offset", 0usize, |s| s.parse().ok())?;
    let split_factor = parse_opt(bag, "storage_alloc_factor", 1.0f64, |s| s.parse().ok())?;
    if !(0.0..=1.0).contains(&split_factor) {
        return Err(Error::Malformed {
            key: "storage_alloc_factor",
            value: split_factor.to_string(),
        });
    }

    let split_order = match bag.get("storage_alloc_order") {
        None => SplitOrder::default(),
        Some("0") => SplitOrder::StoragePrefix,
        Some("1") => SplitOrder::RamPrefix,
        Some(other) => {
            return Err(Error::Malformed {
                key: "storage_alloc_order",
                value: other.to_string(),
            })
        }
    };

    let unlink = match bag.get("storage_alloc_unlink") {
        None => false,
        Some("true") => true,
        Some("false") => false,
        Some(other) => {
            return Err(Error::Malformed {
                key: "storage_alloc_unlink",
                value: other.to_string(),
            })
        }
    };

    let (open_mode, access_pattern) = parse_access_style(bag.get("access_style"));

    let file_mode = parse_opt(bag, "file_perm", DEFAULT_FILE_MODE, |s| {
        s.parse::<i64>().ok().map(|v| v as u32)
    })?;

    let striping_factor = optional_u32(bag, "striping_factor")?;
    let striping_unit = optional_u64(bag, "striping_unit")?;

    Ok(StorageDescriptor {
        filename,
        offset,
        split_factor,
        split_order,
        unlink,
        access_pattern,
        open_mode,
        file_mode,
        striping_factor,
        striping_unit,
    })
}

/// `access_style` is a combination of tokens, any of which may be present
/// (spec §6: "contains read_once | write_once | sequential | random, any
/// combination"). Open mode and kernel advice are derived independently.
fn parse_access_style(raw: Option<&str>) -> (OpenMode, AccessPattern) {
    let Some(raw) = raw else {
        return (OpenMode::default(), AccessPattern::default());
    };
    let tokens: Vec<&str> = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();

    let open_mode = if tokens.contains(&"read_once") {
        OpenMode::ReadOnly
    } else if tokens.contains(&"write_once") {
        OpenMode::WriteOnly
    } else {
        OpenMode::default()
    };

    let access_pattern = if tokens.contains(&"sequential") {
        AccessPattern::Sequential
    } else if tokens.contains(&"random") {
        AccessPattern::Random
    } else {
        AccessPattern::default()
    };

    (open_mode, access_pattern)
}

fn parse_opt<T>(bag: &HintBag, key: &'static str, default: T, parse: impl Fn(&str) -> Option<T>) -> Result<T> {
    match bag.get(key) {
        None => Ok(default),
        Some(raw) => parse(raw).ok_or_else(|| Error::Malformed {
            key,
            value: raw.to_string(),
        }),
    }
}

fn optional_u32(bag: &HintBag, key: &'static str) -> Result<Option<u32>> {
    match bag.get(key) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| Error::Malformed {
                key,
                value: raw.to_string(),
            }),
    }
}

fn optional_u64(bag: &HintBag, key: &'static str) -> Result<Option<u64>> {
    match bag.get(key) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| Error::Malformed {
                key,
                value: raw.to_string(),
            }),
    }
}
