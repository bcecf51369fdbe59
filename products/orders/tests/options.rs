mod common;

use common::{DeskEnv, OPTION_FIELDS};
use serde_json::{Value, json};

const EPSILON: f64 = 1e-9;

async fn create_option(env: &DeskEnv, input: Value) -> Value {
    let query = format!(
        "mutation($input: NewStageOptionInput!) {{ desk {{ createStageOption(input: $input) {{ {OPTION_FIELDS} }} }} }}"
    );
    let data = env.run(&query, json!({ "input": input })).await;
    data["desk"]["createStageOption"].clone()
}

async fn update_option(env: &DeskEnv, input: Value) -> Value {
    let query = format!(
        "mutation($input: UpdateStageOptionInput!) {{ desk {{ updateStageOption(input: $input) {{ {OPTION_FIELDS} }} }} }}"
    );
    let data = env.run(&query, json!({ "input": input })).await;
    data["desk"]["updateStageOption"].clone()
}

fn approx(value: &Value, expected: f64) -> bool {
    value.as_f64().is_some_and(|v| (v - expected).abs() < EPSILON)
}

#[tokio::test]
async fn calculable_option_gets_prices_and_unit_id() {
    let env = DeskEnv::new().await;
    let stage_id = env.stage_fixture().await;

    let option = create_option(
        &env,
        json!({
            "stageId": stage_id,
            "name": "  Translation EN-DE  ",
            "pricingType": "CALCULABLE",
            "nominalVolume": 1000.0,
            "pricePerUnit": 2.0,
            "volumeMin": 500.0,
            "volumeMax": 2000.0,
            "unitLabel": "pcs"
        }),
    )
    .await;

    assert_eq!(option["name"], "Translation EN-DE");
    assert_eq!(option["pricingTypeId"], 1);
    assert!(approx(&option["calculatedPriceMin"], 1.0));
    assert!(approx(&option["calculatedPriceMax"], 4.0));
    assert_eq!(option["unitId"], 3);
    assert_eq!(option["unitLabel"], "pcs");
}

#[tokio::test]
async fn unit_label_is_filled_from_unit_id() {
    let env = DeskEnv::new().await;
    let stage_id = env.stage_fixture().await;

    let option = create_option(
        &env,
        json!({
            "stageId": stage_id,
            "name": "Copy editing",
            "pricingType": "INCLUDED_IN_PRICE",
            "unitId": 1
        }),
    )
    .await;

    assert_eq!(option["unitLabel"], "words");
    assert_eq!(option["calculatedPriceMin"], Value::Null);
    assert_eq!(option["calculatedPriceMax"], Value::Null);
}

#[tokio::test]
async fn unknown_units_do_not_fail_the_write() {
    let env = DeskEnv::new().await;
    let stage_id = env.stage_fixture().await;

    let by_label = create_option(
        &env,
        json!({
            "stageId": stage_id,
            "name": "Film reels",
            "pricingType": "INCLUDED_IN_PRICE",
            "unitLabel": "reels"
        }),
    )
    .await;
    assert_eq!(by_label["unitId"], Value::Null);
    assert_eq!(by_label["unitLabel"], "reels");

    let by_id = create_option(
        &env,
        json!({
            "stageId": stage_id,
            "name": "Mystery unit",
            "pricingType": "INCLUDED_IN_PRICE",
            "unitId": 42
        }),
    )
    .await;
    assert_eq!(by_id["unitId"], Value::Null);
    assert_eq!(by_id["unitLabel"], Value::Null);
}

#[tokio::test]
async fn included_options_ignore_pricing_inputs() {
    let env = DeskEnv::new().await;
    let stage_id = env.stage_fixture().await;

    let option = create_option(
        &env,
        json!({
            "stageId": stage_id,
            "name": "Glossary",
            "pricingType": "INCLUDED_IN_PRICE",
            "nominalVolume": 1000.0,
            "pricePerUnit": 2.0,
            "volumeMin": 500.0,
            "volumeMax": 2000.0
        }),
    )
    .await;

    assert_eq!(option["calculatedPriceMin"], Value::Null);
    assert_eq!(option["calculatedPriceMax"], Value::Null);
    assert!(approx(&option["nominalVolume"], 1000.0));
}

#[tokio::test]
async fn calculable_option_without_nominal_volume_is_rejected() {
    let env = DeskEnv::new().await;
    let stage_id = env.stage_fixture().await;

    let code = env
        .error_code(
            "mutation($input: NewStageOptionInput!) { desk { createStageOption(input: $input) { id } } }",
            json!({ "input": {
                "stageId": stage_id,
                "name": "Broken",
                "pricingType": "CALCULABLE",
                "pricePerUnit": 2.0
            } }),
        )
        .await;
    assert_eq!(code, "VALIDATION");

    let code = env
        .error_code(
            "mutation($input: NewStageOptionInput!) { desk { createStageOption(input: $input) { id } } }",
            json!({ "input": {
                "stageId": stage_id,
                "name": "Zero",
                "pricingType": "CALCULABLE",
                "nominalVolume": 0.0,
                "pricePerUnit": 2.0
            } }),
        )
        .await;
    assert_eq!(code, "VALIDATION");

    let data = env
        .run(
            "query($stageId: ID!) { desk { stageOptions(stageId: $stageId) { id } } }",
            json!({ "stageId": stage_id }),
        )
        .await;
    assert_eq!(data["desk"]["stageOptions"], json!([]));
}

#[tokio::test]
async fn option_whose_prices_overflow_is_rejected() {
    let env = DeskEnv::new().await;
    let stage_id = env.stage_fixture().await;

    let code = env
        .error_code(
            "mutation($input: NewStageOptionInput!) { desk { createStageOption(input: $input) { id } } }",
            json!({ "input": {
                "stageId": stage_id,
                "name": "Overflow",
                "pricingType": "CALCULABLE",
                "volumeMin": 1e300,
                "volumeMax": 1e300,
                "nominalVolume": 1e-300,
                "pricePerUnit": 1e300
            } }),
        )
        .await;
    assert_eq!(code, "VALIDATION");

    let code = env
        .error_code(
            "query($input: OptionPriceInput!) { desk { optionPricePreview(input: $input) { calculatedPriceMin } } }",
            json!({ "input": {
                "pricingType": "CALCULABLE",
                "volumeMin": 1e300,
                "volumeMax": 1e300,
                "nominalVolume": 1e-300,
                "pricePerUnit": 1e300
            } }),
        )
        .await;
    assert_eq!(code, "VALIDATION");

    let data = env
        .run(
            "query($stageId: ID!) { desk { stageOptions(stageId: $stageId) { id } } }",
            json!({ "stageId": stage_id }),
        )
        .await;
    assert_eq!(data["desk"]["stageOptions"], json!([]));
}

#[tokio::test]
async fn option_on_missing_stage_is_a_validation_error() {
    let env = DeskEnv::new().await;
    let code = env
        .error_code(
            "mutation($input: NewStageOptionInput!) { desk { createStageOption(input: $input) { id } } }",
            json!({ "input": {
                "stageId": "00000000-0000-4000-8000-000000000000",
                "name": "Orphan",
                "pricingType": "INCLUDED_IN_PRICE"
            } }),
        )
        .await;
    assert_eq!(code, "VALIDATION");
}

#[tokio::test]
async fn update_merges_with_stored_row_and_reprices() {
    let env = DeskEnv::new().await;
    let stage_id = env.stage_fixture().await;
    let option = create_option(
        &env,
        json!({
            "stageId": stage_id,
            "name": "Proofreading",
            "pricingType": "CALCULABLE",
            "nominalVolume": 10.0,
            "pricePerUnit": 3.0,
            "volumeMin": 5.0,
            "volumeMax": 20.0,
            "unitId": 4
        }),
    )
    .await;
    let id = option["id"].as_str().unwrap();

    let updated = update_option(&env, json!({ "id": id, "pricePerUnit": 6.0, "volumeMax": null })).await;
    assert!(approx(&updated["calculatedPriceMin"], 3.0));
    assert_eq!(updated["calculatedPriceMax"], Value::Null);
    assert_eq!(updated["unitLabel"], "pages");
    assert_eq!(updated["name"], "Proofreading");

    let switched = update_option(&env, json!({ "id": id, "pricingType": "INCLUDED_IN_PRICE" })).await;
    assert_eq!(switched["calculatedPriceMin"], Value::Null);
    assert_eq!(switched["calculatedPriceMax"], Value::Null);

    let relabelled = update_option(&env, json!({ "id": id, "unitId": 2 })).await;
    assert_eq!(relabelled["unitId"], 2);
    assert_eq!(relabelled["unitLabel"], "chars");
}

#[tokio::test]
async fn update_that_breaks_the_pricing_invariant_is_rejected() {
    let env = DeskEnv::new().await;
    let stage_id = env.stage_fixture().await;
    let option = create_option(
        &env,
        json!({
            "stageId": stage_id,
            "name": "Typesetting",
            "pricingType": "CALCULABLE",
            "nominalVolume": 1.0,
            "pricePerUnit": 12.0,
            "volumeMin": 10.0
        }),
    )
    .await;
    let id = option["id"].as_str().unwrap();

    let code = env
        .error_code(
            "mutation($input: UpdateStageOptionInput!) { desk { updateStageOption(input: $input) { id } } }",
            json!({ "input": { "id": id, "nominalVolume": null } }),
        )
        .await;
    assert_eq!(code, "VALIDATION");

    let data = env
        .run(
            &format!("query($id: ID!) {{ desk {{ stageOption(id: $id) {{ {OPTION_FIELDS} }} }} }}"),
            json!({ "id": id }),
        )
        .await;
    assert!(approx(&data["desk"]["stageOption"]["nominalVolume"], 1.0));
    assert!(approx(&data["desk"]["stageOption"]["calculatedPriceMin"], 120.0));
}

#[tokio::test]
async fn deleting_a_stage_removes_its_options() {
    let env = DeskEnv::new().await;
    let stage_id = env.stage_fixture().await;
    let option = create_option(
        &env,
        json!({ "stageId": stage_id, "name": "Cover", "pricingType": "INCLUDED_IN_PRICE" }),
    )
    .await;

    let data = env
        .run(
            "mutation($id: ID!) { desk { deleteStage(id: $id) } }",
            json!({ "id": stage_id }),
        )
        .await;
    assert_eq!(data["desk"]["deleteStage"], true);

    let data = env
        .run(
            "query($id: ID!) { desk { stageOption(id: $id) { id } } }",
            json!({ "id": option["id"] }),
        )
        .await;
    assert_eq!(data["desk"]["stageOption"], Value::Null);
}

#[tokio::test]
async fn delete_option_reports_missing_rows() {
    let env = DeskEnv::new().await;
    let code = env
        .error_code(
            "mutation($id: ID!) { desk { deleteStageOption(id: $id) } }",
            json!({ "id": "00000000-0000-4000-8000-000000000001" }),
        )
        .await;
    assert_eq!(code, "NOT_FOUND");

    let code = env
        .error_code(
            "mutation($id: ID!) { desk { deleteStageOption(id: $id) } }",
            json!({ "id": "not-a-uuid" }),
        )
        .await;
    assert_eq!(code, "BAD_REQUEST");
}

#[tokio::test]
async fn price_preview_runs_the_same_rule() {
    let env = DeskEnv::new().await;
    let data = env
        .run(
            "query($input: OptionPriceInput!) { desk { optionPricePreview(input: $input) { calculatedPriceMin calculatedPriceMax } } }",
            json!({ "input": {
                "pricingType": "CALCULABLE",
                "nominalVolume": 1000.0,
                "pricePerUnit": 2.0,
                "volumeMin": 500.0,
                "volumeMax": 2000.0
            } }),
        )
        .await;
    let preview = &data["desk"]["optionPricePreview"];
    assert!(approx(&preview["calculatedPriceMin"], 1.0));
    assert!(approx(&preview["calculatedPriceMax"], 4.0));

    let code = env
        .error_code(
            "query($input: OptionPriceInput!) { desk { optionPricePreview(input: $input) { calculatedPriceMin } } }",
            json!({ "input": {
                "pricingType": "CALCULABLE",
                "nominalVolume": 10.0,
                "pricePerUnit": 2.0,
                "volumeMin": 50.0,
                "volumeMax": 20.0
            } }),
        )
        .await;
    assert_eq!(code, "VALIDATION");
}

#[tokio::test]
async fn units_can_be_added_and_used_by_label() {
    let env = DeskEnv::new().await;
    let data = env
        .run(
            r#"mutation { desk { createUnit(shortName: "min", name: "Minutes") { id shortName } } }"#,
            json!({}),
        )
        .await;
    let unit_id = data["desk"]["createUnit"]["id"].clone();

    let code = env
        .error_code(
            r#"mutation { desk { createUnit(shortName: "min", name: "Minutes again") { id } } }"#,
            json!({}),
        )
        .await;
    assert_eq!(code, "VALIDATION");

    let code = env
        .error_code(
            "mutation($short: String!) { desk { createUnit(shortName: $short, name: \"Too long\") { id } } }",
            json!({ "short": "x".repeat(33) }),
        )
        .await;
    assert_eq!(code, "VALIDATION");

    let code = env
        .error_code(
            "mutation($name: String!) { desk { createUnit(shortName: \"hrs\", name: $name) { id } } }",
            json!({ "name": "h".repeat(129) }),
        )
        .await;
    assert_eq!(code, "VALIDATION");

    let stage_id = env.stage_fixture().await;
    let option = create_option(
        &env,
        json!({ "stageId": stage_id, "name": "Voice-over", "pricingType": "INCLUDED_IN_PRICE", "unitLabel": "min" }),
    )
    .await;
    assert_eq!(option["unitId"], unit_id);

    let data = env.run("{ desk { units { shortName } pricingTypes { id code } } }", json!({})).await;
    assert_eq!(data["desk"]["units"].as_array().unwrap().len(), 5);
    assert_eq!(
        data["desk"]["pricingTypes"],
        json!([
            { "id": 1, "code": "CALCULABLE" },
            { "id": 2, "code": "INCLUDED_IN_PRICE" }
        ])
    );
}
