use base::Vec2;
use image::{Image, PixelFormat};

fn canvas() -> Image {
    Image::blank(Vec2::new(40, 20), PixelFormat::Rgb8)
}

fn count(image: &Image, color: [u8; 3]) -> usize {
    image.data.chunks_exact(3).filter(|c| *c == color).count()
}

#[test]
fn test_horizontal_line_spans_image() {
    let mut image = canvas();
    image::draw_line(&mut image, 0, 5, 40, 5, image::GRAY);
    assert_eq!(count(&image, image::GRAY), 40);
    assert_eq!(image::get_pixel(&image, 39, 5), Some(image::GRAY));
}

#[test]
fn test_line_outside_is_clipped() {
    let mut image = canvas();
    image::draw_line(&mut image, -10, -3, -1, -3, image::WHITE);
    assert_eq!(count(&image, image::WHITE), 0);
}

#[test]
fn test_filled_circle_area() {
    let mut image = canvas();
    image::draw_filled_circle(&mut image, 10, 10, 1, image::GREEN);
    assert_eq!(count(&image, image::GREEN), 5);
}

#[test]
fn test_circle_at_border_does_not_panic() {
    let mut image = canvas();
    image::draw_filled_circle(&mut image, 0, 0, 5, image::RED);
    assert!(count(&image, image::RED) > 0);
}

#[test]
fn test_text_advances_pen() {
    let mut image = canvas();
    let end = image::draw_text(&mut image, 1, 1, "Ab", 1, image::YELLOW);
    assert_eq!(end, 13);
    assert!(count(&image, image::YELLOW) > 0);
}

#[test]
fn test_space_draws_nothing() {
    let mut image = canvas();
    image::draw_text(&mut image, 0, 0, "   ", 2, image::CYAN);
    assert_eq!(count(&image, image::CYAN), 0);
}

#[test]
fn test_drawing_ignores_gray_images() {
    let mut image = Image::blank(Vec2::new(4, 4), PixelFormat::Gray8);
    image::set_pixel(&mut image, 1, 1, image::WHITE);
    assert!(image.data.iter().all(|&v| v == 0));
}
