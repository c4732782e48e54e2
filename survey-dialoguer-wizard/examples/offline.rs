//! Take a built-in survey without a server, using the scripted test gateway.
//!
//! Run with: cargo run -p survey-dialoguer-wizard --example offline

use survey_client::{Question, Survey, SurveySession, TestGateway};
use survey_dialoguer_wizard::DialoguerWizard;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let survey = Survey::new(
        "lunch",
        "Team lunch",
        vec![
            Question::single_select("cuisine", "Which cuisine?", ["Thai", "Pizza", "Sushi"])
                .required(),
            Question::multi_select("days", "Which days work?", ["Mon", "Tue", "Wed", "Thu", "Fri"]),
            Question::rating("last", "How was the last lunch?", 1, 5).required(),
            Question::yes_no("vegetarian", "Vegetarian options needed?"),
            Question::free_text("comments", "Anything else?"),
        ],
    )?
    .with_description("Help us pick the next team lunch.");

    let gateway = TestGateway::new().with_survey(survey);
    let mut session = SurveySession::new("lunch");

    let record = DialoguerWizard::new().run(&mut session, &gateway).await?;
    println!("{record:#?}");
    Ok(())
}
