use examsim_core::grading;

pub fn run(percentage: u8) -> Result<(), Box<dyn std::error::Error>> {
    if percentage > 100 {
        return Err(format!("percentage must be between 0 and 100, got {percentage}").into());
    }
    let grade = grading::grade(percentage);
    let json = serde_json::json!({
        "grade": grade,
        "is_certificate_eligible": grading::is_certificate_eligible(percentage),
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
