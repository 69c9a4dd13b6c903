pub mod beds;
pub mod patients;

/// Print the outcome of a mutating command.
fn report(message: &str, json: bool) {
    if json {
        println!("{}", serde_json::json!({ "message": message }));
    } else {
        crate::render::success(message);
    }
}
