use std::fmt;
use num_enum::TryFromPrimitive;

/// Render a raw id as its enum variant name, or as hex when it maps to nothing.
pub fn enum_name_or_hex<T>(raw: T::Primitive) -> String
where
    T: TryFromPrimitive + fmt::Debug,
    T::Primitive: fmt::LowerHex,
{
    match T::try_from_primitive(raw) {
        Ok(variant) => format!("{:?}", variant),
        Err(_) => format!("0x{:x}", raw),
    }
}

/// Reject levels outside `[min, max]` before any native allocation happens.
pub fn check_level(level: i32, (min, max): (i32, i32)) -> Result<i32, (i32, i32)> {
    if (min..=max).contains(&level) {
        Ok(level)
    } else {
        Err((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::CompressionCodec;

    #[test]
    fn known_ids_render_as_names() {
        assert_eq!(enum_name_or_hex::<CompressionCodec>(0x0001), "Zstd");
        assert_eq!(enum_name_or_hex::<CompressionCodec>(0x0002), "0x2");
    }

    #[test]
    fn level_bounds_are_inclusive() {
        assert_eq!(check_level(0, (0, 9)), Ok(0));
        assert_eq!(check_level(9, (0, 9)), Ok(9));
        assert_eq!(check_level(10, (0, 9)), Err((0, 9)));
        assert_eq!(check_level(-1, (0, 9)), Err((0, 9)));
    }
}
