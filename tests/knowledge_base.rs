use std::fs;

use kb_lookup::rag::{KeyStrategy, KeywordContextBuilder, KnowledgeIndex, KnowledgeSource};
use tempfile::TempDir;

fn corpus() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let employees = tmp.path().join("employees");
    let products = tmp.path().join("products");
    fs::create_dir_all(&employees).unwrap();
    fs::create_dir_all(&products).unwrap();

    fs::write(employees.join("Alex Lancaster.md"), "# Alex Lancaster\nCEO of Insurellm").unwrap();
    fs::write(employees.join("Maxine Thompson.md"), "# Maxine Thompson\nData engineer").unwrap();
    fs::write(products.join("Carllm.md"), "# CarLLM\nAuto insurance portal").unwrap();
    fs::write(products.join("Homellm.md"), "# HomeLLM\nHome insurance portal").unwrap();
    tmp
}

fn load(tmp: &TempDir) -> KnowledgeIndex {
    KnowledgeIndex::load(&[
        KnowledgeSource::new(tmp.path().join("employees"), KeyStrategy::LastWord),
        KnowledgeSource::new(tmp.path().join("products"), KeyStrategy::Stem),
    ])
    .unwrap()
}

#[test]
fn loads_employees_and_products() {
    let tmp = corpus();
    let index = load(&tmp);

    assert_eq!(index.keys(), vec!["carllm", "homellm", "lancaster", "thompson"]);
    assert_eq!(index.get("lancaster"), Some("# Alex Lancaster\nCEO of Insurellm"));
}

#[test]
fn question_pulls_in_named_documents() {
    let tmp = corpus();
    let index = load(&tmp);

    let docs = index.relevant_documents("Who is Lancaster and what is carllm?");
    assert_eq!(
        docs,
        vec!["# Alex Lancaster\nCEO of Insurellm", "# CarLLM\nAuto insurance portal"]
    );
}

#[test]
fn context_for_unrelated_question() {
    let tmp = corpus();
    let index = load(&tmp);
    let builder = KeywordContextBuilder::default();

    assert_eq!(
        builder.additional_context(&index, "How do I file a claim?"),
        "There is no additional context relevant to the user's question."
    );
    assert!(builder
        .additional_context(&index, "Does Maxine Thompson work on HomeLLM?")
        .ends_with("# Maxine Thompson\nData engineer\n\n# HomeLLM\nHome insurance portal"));
}
