/// Split a fixed size array off the front of the data
#[inline]
pub(crate) fn get_split<const N: usize>(data: &[u8]) -> Option<([u8; N], &[u8])> {
    if data.len() < N {
        return None;
    }

    let (head, rest) = data.split_at(N);
    let mut out = [0u8; N];
    out.copy_from_slice(head);
    Some((out, rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(&[], None)]
    #[case(&[1, 2, 3], None)]
    #[case(&[1, 2, 3, 4], Some(([1, 2, 3, 4], &[][..])))]
    #[case(&[1, 2, 3, 4, 5], Some(([1, 2, 3, 4], &[5][..])))]
    fn test_get_split(#[case] input: &[u8], #[case] expected: Option<([u8; 4], &[u8])>) {
        assert_eq!(get_split::<4>(input), expected);
    }
}
