//! Clipped RGBA8 drawing helpers shared by the plan view and the overlay.

pub(crate) fn write_pixel_rgba(frame: &mut [u8], width: u32, x: i32, y: i32, color: [u8; 4]) {
    if x < 0 || y < 0 || x >= width as i32 {
        return;
    }
    let Some(pixel_offset) = (y as usize)
        .checked_mul(width as usize)
        .and_then(|row| row.checked_add(x as usize))
    else {
        return;
    };
    let Some(byte_offset) = pixel_offset.checked_mul(4) else {
        return;
    };
    let Some(end) = byte_offset.checked_add(4) else {
        return;
    };
    if end > frame.len() {
        return;
    }

    frame[byte_offset..end].copy_from_slice(&color);
}

pub(crate) fn clear(frame: &mut [u8], color: [u8; 4]) {
    for chunk in frame.chunks_exact_mut(4) {
        chunk.copy_from_slice(&color);
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn fill_rect(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rect_width: i32,
    rect_height: i32,
    color: [u8; 4],
) {
    let start_x = x.max(0);
    let start_y = y.max(0);
    let end_x = x.saturating_add(rect_width).min(width as i32);
    let end_y = y.saturating_add(rect_height).min(height as i32);
    if end_x <= start_x || end_y <= start_y {
        return;
    }

    for py in start_y..end_y {
        for px in start_x..end_x {
            write_pixel_rgba(frame, width, px, py, color);
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn rect_outline(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rect_width: i32,
    rect_height: i32,
    color: [u8; 4],
) {
    if rect_width <= 1 || rect_height <= 1 {
        return;
    }
    fill_rect(frame, width, height, x, y, rect_width, 1, color);
    fill_rect(
        frame,
        width,
        height,
        x,
        y + rect_height - 1,
        rect_width,
        1,
        color,
    );
    fill_rect(frame, width, height, x, y, 1, rect_height, color);
    fill_rect(
        frame,
        width,
        height,
        x + rect_width - 1,
        y,
        1,
        rect_height,
        color,
    );
}

/// Bresenham line, clipped per pixel.
pub(crate) fn line(
    frame: &mut [u8],
    width: u32,
    from: (i32, i32),
    to: (i32, i32),
    color: [u8; 4],
) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let step_x = if x < to.0 { 1 } else { -1 };
    let step_y = if y < to.1 { 1 } else { -1 };
    let mut error = dx + dy;

    loop {
        write_pixel_rgba(frame, width, x, y, color);
        if x == to.0 && y == to.1 {
            break;
        }
        let doubled = 2 * error;
        if doubled >= dy {
            error += dy;
            x += step_x;
        }
        if doubled <= dx {
            error += dx;
            y += step_y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(frame: &[u8], width: u32, x: usize, y: usize) -> [u8; 4] {
        let offset = (y * width as usize + x) * 4;
        [
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut frame = vec![0u8; 4 * 4 * 4];
        write_pixel_rgba(&mut frame, 4, -1, 0, [255; 4]);
        write_pixel_rgba(&mut frame, 4, 4, 0, [255; 4]);
        write_pixel_rgba(&mut frame, 4, 0, 4, [255; 4]);
        assert!(frame.iter().all(|byte| *byte == 0));
    }

    #[test]
    fn fill_rect_clips_to_frame() {
        let mut frame = vec![0u8; 4 * 4 * 4];
        fill_rect(&mut frame, 4, 4, -2, -2, 4, 4, [9, 9, 9, 255]);
        assert_eq!(pixel(&frame, 4, 0, 0), [9, 9, 9, 255]);
        assert_eq!(pixel(&frame, 4, 1, 1), [9, 9, 9, 255]);
        assert_eq!(pixel(&frame, 4, 2, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn line_hits_both_endpoints() {
        let mut frame = vec![0u8; 8 * 8 * 4];
        line(&mut frame, 8, (1, 6), (6, 2), [1, 2, 3, 255]);
        assert_eq!(pixel(&frame, 8, 1, 6), [1, 2, 3, 255]);
        assert_eq!(pixel(&frame, 8, 6, 2), [1, 2, 3, 255]);
    }

    #[test]
    fn line_far_outside_frame_is_safe() {
        let mut frame = vec![0u8; 4 * 4 * 4];
        line(&mut frame, 4, (-50, -50), (-10, -40), [1, 2, 3, 255]);
        assert!(frame.iter().all(|byte| *byte == 0));
    }
}
