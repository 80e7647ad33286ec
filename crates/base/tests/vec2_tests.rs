use base::Vec2;

#[test]
fn test_area() {
    assert_eq!(Vec2::new(320usize, 240).area(), 76800);
}

#[test]
fn test_is_empty() {
    assert!(Vec2::new(0usize, 240).is_empty());
    assert!(Vec2::new(320usize, 0).is_empty());
    assert!(!Vec2::new(1usize, 1).is_empty());
}

#[test]
fn test_contains() {
    let size = Vec2::new(320usize, 240);
    assert!(size.contains(0, 0));
    assert!(size.contains(319, 239));
    assert!(!size.contains(320, 10));
    assert!(!size.contains(-1, 10));
    assert!(!size.contains(10, 240));
}

#[test]
fn test_display() {
    assert_eq!(Vec2::new(320usize, 240).to_string(), "320x240");
}

#[test]
fn test_add_sub() {
    let a = Vec2::new(3i32, 4);
    let b = Vec2::new(1i32, 2);
    assert_eq!(a + b, Vec2::new(4, 6));
    assert_eq!(a - b, Vec2::new(2, 2));
}
