//! Tests for error formatting and conversions

#[cfg(test)]
mod tests {
    use dotmosaic::MosaicError;
    use dotmosaic::io::error::{decode_error, invalid_parameter};
    use std::error::Error;
    use std::path::PathBuf;

    // Tests messages carry the offending values
    #[test]
    fn test_display_messages() {
        let dims = MosaicError::InvalidDimensions { width: 0, height: 4 };
        assert!(dims.to_string().contains("0x4"));

        let color = MosaicError::InvalidColor {
            value: "#XYZ".to_string(),
        };
        assert!(color.to_string().contains("#XYZ"));

        let bounds = MosaicError::PixelOutOfBounds {
            x: 9,
            y: 2,
            dimensions: (4, 4),
        };
        assert!(bounds.to_string().contains('9'));

        assert!(MosaicError::EmptyPalette.to_string().contains("empty"));
        assert!(MosaicError::Cancelled.to_string().to_lowercase().contains("cancel"));
    }

    // Tests the parameter helper
    #[test]
    fn test_invalid_parameter() {
        let err = invalid_parameter("scale", &0, &"must be positive");
        let MosaicError::InvalidParameter {
            parameter,
            value,
            reason,
        } = &err
        else {
            unreachable!("helper builds InvalidParameter");
        };
        assert_eq!(*parameter, "scale");
        assert_eq!(value, "0");
        assert_eq!(reason, "must be positive");
        assert!(err.to_string().contains("scale"));
    }

    // Tests wrapped errors expose their source
    #[test]
    fn test_error_sources() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let fs = MosaicError::FileSystem {
            path: PathBuf::from("palette.txt"),
            operation: "read palette",
            source: io,
        };
        assert!(fs.source().is_some());
        assert!(fs.to_string().contains("palette.txt"));

        let decode = decode_error(
            "upload-7",
            image::ImageError::IoError(std::io::Error::other("bad header")),
        );
        assert!(matches!(&decode, MosaicError::ImageDecode { source_id, .. } if source_id == "upload-7"));
        assert!(decode.source().is_some());

        assert!(MosaicError::EmptyPalette.source().is_none());
    }

    // Tests io errors convert into file system errors
    #[test]
    fn test_from_io_error() {
        let err: MosaicError = std::io::Error::other("boom").into();
        assert!(matches!(err, MosaicError::FileSystem { .. }));
    }
}
