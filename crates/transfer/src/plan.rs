//! Maps a session's presigned parts onto contiguous byte ranges of a file.

use modelrepo_protocol::UploadPart;

use crate::TransferError;

/// One part of the upload, resolved to the byte range it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedPart {
    pub part_number: i32,
    pub url: String,
    /// Byte offset of the range within the file.
    pub offset: u64,
    /// Range length; equals the session part size except for the last part.
    pub len: u64,
}

impl PlannedPart {
    /// Offset one past the last byte of this range.
    pub fn end(&self) -> u64 {
        self.offset + self.len
    }
}

/// Computes the byte range of every part.
///
/// Parts are sorted by part number first; the wire order is not trusted.
/// Each part takes `min(part_size, remaining)` bytes starting where the
/// previous one ended. Fails if a part would start at or past the end of
/// the file, or if the parts together do not cover the whole file.
pub fn plan_parts(
    parts: &[UploadPart],
    part_size: i64,
    file_size: u64,
) -> Result<Vec<PlannedPart>, TransferError> {
    if part_size <= 0 {
        return Err(TransferError::InvalidPartSize(part_size));
    }
    if parts.is_empty() {
        return Err(TransferError::NoParts);
    }
    let part_size = part_size as u64;

    let mut sorted: Vec<&UploadPart> = parts.iter().collect();
    sorted.sort_by_key(|p| p.part_number);

    let mut planned = Vec::with_capacity(sorted.len());
    let mut offset: u64 = 0;

    for (i, part) in sorted.iter().enumerate() {
        if i > 0 && sorted[i - 1].part_number == part.part_number {
            return Err(TransferError::DuplicatePart(part.part_number));
        }

        let remaining = file_size.saturating_sub(offset);
        if remaining == 0 {
            return Err(TransferError::NoDataRemaining(part.part_number));
        }

        let len = part_size.min(remaining);
        planned.push(PlannedPart {
            part_number: part.part_number,
            url: part.url.clone(),
            offset,
            len,
        });
        offset += len;
    }

    ensure_fully_uploaded(offset, file_size)?;
    Ok(planned)
}

/// Terminal byte-accounting check: `uploaded` must equal the file size.
pub fn ensure_fully_uploaded(uploaded: u64, file_size: u64) -> Result<(), TransferError> {
    if uploaded != file_size {
        return Err(TransferError::SizeMismatch {
            uploaded,
            expected: file_size,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(numbers: &[i32]) -> Vec<UploadPart> {
        numbers
            .iter()
            .map(|&n| UploadPart {
                part_number: n,
                url: format!("https://store/part/{n}"),
                expires_at: String::new(),
            })
            .collect()
    }

    fn ranges(plan: &[PlannedPart]) -> Vec<(i32, u64, u64)> {
        plan.iter().map(|p| (p.part_number, p.offset, p.len)).collect()
    }

    #[test]
    fn single_part_covers_file() {
        let plan = plan_parts(&parts(&[1]), 10, 10).unwrap();
        assert_eq!(ranges(&plan), vec![(1, 0, 10)]);
    }

    #[test]
    fn last_part_is_short() {
        let plan = plan_parts(&parts(&[1, 2, 3]), 10, 25).unwrap();
        assert_eq!(ranges(&plan), vec![(1, 0, 10), (2, 10, 10), (3, 20, 5)]);
        assert_eq!(plan.last().unwrap().end(), 25);
    }

    #[test]
    fn parts_sorted_before_planning() {
        let plan = plan_parts(&parts(&[3, 1, 2]), 10, 25).unwrap();
        assert_eq!(ranges(&plan), vec![(1, 0, 10), (2, 10, 10), (3, 20, 5)]);
        assert_eq!(plan[0].url, "https://store/part/1");
    }

    #[test]
    fn short_plan_is_size_mismatch() {
        let err = plan_parts(&parts(&[1, 2]), 10, 25).unwrap_err();
        assert!(matches!(
            err,
            TransferError::SizeMismatch {
                uploaded: 20,
                expected: 25
            }
        ));
        assert_eq!(
            err.to_string(),
            "uploaded 20 bytes but artifact size is 25 bytes"
        );
    }

    #[test]
    fn long_plan_runs_out_of_data() {
        let err = plan_parts(&parts(&[1, 2, 3, 4]), 10, 25).unwrap_err();
        assert!(matches!(err, TransferError::NoDataRemaining(4)));
        assert_eq!(err.to_string(), "no data remaining for part 4");
    }

    #[test]
    fn zero_or_negative_part_size_rejected() {
        assert!(matches!(
            plan_parts(&parts(&[1]), 0, 10),
            Err(TransferError::InvalidPartSize(0))
        ));
        assert!(matches!(
            plan_parts(&parts(&[1]), -5, 10),
            Err(TransferError::InvalidPartSize(-5))
        ));
    }

    #[test]
    fn empty_part_list_rejected() {
        assert!(matches!(
            plan_parts(&[], 10, 10),
            Err(TransferError::NoParts)
        ));
    }

    #[test]
    fn duplicate_part_numbers_rejected() {
        assert!(matches!(
            plan_parts(&parts(&[1, 1]), 10, 20),
            Err(TransferError::DuplicatePart(1))
        ));
    }

    #[test]
    fn ranges_conserve_bytes() {
        for file_size in [1u64, 9, 10, 11, 99, 100, 101] {
            let part_size = 10i64;
            let count = file_size.div_ceil(part_size as u64) as i32;
            let numbers: Vec<i32> = (1..=count).collect();
            let plan = plan_parts(&parts(&numbers), part_size, file_size).unwrap();

            let total: u64 = plan.iter().map(|p| p.len).sum();
            assert_eq!(total, file_size);
            for pair in plan.windows(2) {
                assert_eq!(pair[0].end(), pair[1].offset);
                assert_eq!(pair[0].len, part_size as u64);
            }
        }
    }

    #[test]
    fn ensure_fully_uploaded_checks_equality() {
        assert!(ensure_fully_uploaded(25, 25).is_ok());
        assert!(ensure_fully_uploaded(24, 25).is_err());
        assert!(ensure_fully_uploaded(26, 25).is_err());
    }
}
