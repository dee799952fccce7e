use super::BBoxPx;

pub(super) fn intersection_area(a: &BBoxPx, b: &BBoxPx) -> u64 {
    let ax2 = a.x + a.w;
    let ay2 = a.y + a.h;
    let bx2 = b.x + b.w;
    let by2 = b.y + b.h;

    let ix1 = a.x.max(b.x);
    let iy1 = a.y.max(b.y);
    let ix2 = ax2.min(bx2);
    let iy2 = ay2.min(by2);

    if ix2 <= ix1 || iy2 <= iy1 {
        return 0;
    }
    (ix2 - ix1) as u64 * (iy2 - iy1) as u64
}

/// Number of box pairs sharing at least one pixel.
pub(super) fn overlapping_pairs(boxes: &[BBoxPx]) -> usize {
    let mut count = 0;
    for (i, a) in boxes.iter().enumerate() {
        for b in &boxes[i + 1..] {
            if intersection_area(a, b) > 0 {
                count += 1;
            }
        }
    }
    count
}
