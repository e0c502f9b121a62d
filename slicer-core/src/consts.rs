/// Default slice width and height in pixels.
///
/// 640 matches the input resolution most YOLO detectors are trained at, so
/// slices can be fed to the model without resizing.
pub const DEFAULT_SLICE_SIZE: u32 = 640;

/// Default overlap ratio between neighbouring slices on both axes.
///
/// The actual overlap in pixels is `floor(ratio * slice_size)`.
pub const DEFAULT_OVERLAP_RATIO: f64 = 0.2;

/// Image file extensions picked up from the input folder (case insensitive).
pub const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "bmp", "tif", "tiff", "webp"];

/// Extension of the YOLO label file that sits next to every image.
pub const LABEL_EXTENSION: &str = "txt";

/// Number of whitespace separated fields in a YOLO detection row:
/// `class_id center_x center_y width height`.
pub const LABEL_FIELDS: usize = 5;

/// Name of the optional batch manifest written to the output folder.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Sub folder of the output folder that receives grid preview images.
pub const PREVIEW_DIR_NAME: &str = "preview";

/// Line thickness of the slice rectangles drawn on preview images.
pub const PREVIEW_LINE_WIDTH: i32 = 3;

/// Colors cycled through when drawing slice rectangles on a preview.
pub const PREVIEW_COLORS: [[u8; 3]; 6] = [
    [255, 0, 0],   // Red
    [0, 255, 0],   // Green
    [0, 0, 255],   // Blue
    [255, 255, 0], // Yellow
    [255, 0, 255], // Magenta
    [0, 255, 255], // Cyan
];
