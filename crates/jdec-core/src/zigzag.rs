//! Zigzag scan order of an 8x8 block.

/// Zigzag position to natural (row-major) position.
pub const ZIGZAG_TO_NATURAL: [usize; 64] = [
    0, 1, 8, 16, 9, 2, 3, 10, 17, 24, 32, 25, 18, 11, 4, 5, 12, 19, 26, 33, 40, 48, 41, 34, 27, 20,
    13, 6, 7, 14, 21, 28, 35, 42, 49, 56, 57, 50, 43, 36, 29, 22, 15, 23, 30, 37, 44, 51, 58, 59,
    52, 45, 38, 31, 39, 46, 53, 60, 61, 54, 47, 55, 62, 63,
];

/// Generate the zigzag permutation by walking the anti-diagonals of the block.
///
/// Entry `k` is the natural index of the `k`-th coefficient in decode order. The result equals
/// [`ZIGZAG_TO_NATURAL`]; the decoder computes it once per instance.
pub fn zigzag_order() -> [usize; 64] {
    let mut order = [0usize; 64];
    let (mut row, mut col) = (0usize, 0usize);
    let mut up = true;

    for slot in order.iter_mut() {
        *slot = row * 8 + col;

        if up {
            if col == 7 {
                row += 1;
                up = false;
            } else if row == 0 {
                col += 1;
                up = false;
            } else {
                row -= 1;
                col += 1;
            }
        } else if row == 7 {
            col += 1;
            up = true;
        } else if col == 0 {
            row += 1;
            up = true;
        } else {
            row += 1;
            col -= 1;
        }
    }

    order
}
