/// Converts a weighted average on the 1–5 school scale into its verbal grade.
///
/// | Average     | Grade         |
/// |-------------|---------------|
/// | < 1.0       | -             |
/// | < 1.5       | výborný       |
/// | < 2.5       | chvalitebný   |
/// | < 3.5       | dobrý         |
/// | < 4.5       | dostatečný    |
/// | >= 4.5      | nedostatečný  |
///
/// Averages below 1 are off the scale (a zero average means nothing could be
/// averaged; negative weights can push it lower) and map to `-`.
pub fn verbal_grade(average: f64) -> String {
    match average {
        a if a < 1.0 => "-".into(),
        a if a < 1.5 => "výborný".into(),
        a if a < 2.5 => "chvalitebný".into(),
        a if a < 3.5 => "dobrý".into(),
        a if a < 4.5 => "dostatečný".into(),
        _ => "nedostatečný".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbal_grade_boundaries() {
        assert_eq!(verbal_grade(1.0), "výborný");
        assert_eq!(verbal_grade(1.49), "výborný");
        assert_eq!(verbal_grade(1.5), "chvalitebný");
        assert_eq!(verbal_grade(2.49), "chvalitebný");
        assert_eq!(verbal_grade(2.5), "dobrý");
        assert_eq!(verbal_grade(3.5), "dostatečný");
        assert_eq!(verbal_grade(4.49), "dostatečný");
        assert_eq!(verbal_grade(4.5), "nedostatečný");
        assert_eq!(verbal_grade(5.0), "nedostatečný");
    }

    #[test]
    fn test_verbal_grade_off_scale() {
        assert_eq!(verbal_grade(0.0), "-");
        assert_eq!(verbal_grade(0.99), "-");
        assert_eq!(verbal_grade(-2.0), "-");
    }
}
