use lancamento_mensal::infrastructure::{JsonKeyValueStore, JsonRecordStore, TomlSchoolDirectory};
use lancamento_mensal::{
    CadastroField, CursorStore, Period, ResolvedState, Step, UtilityKind, Wizard, WizardState,
};
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};
use tokio_test::{assert_err, assert_ok};

const SCHOOLS: &str = r#"
[[schools]]
id = "3"
name = "EMEF Zumbi dos Palmares"
neighborhood = "Vila Nova"

[[schools]]
id = "1"
name = "CEI Aurora"

[[schools]]
id = "2"
name = "emei Beija-Flor"
"#;

struct Files {
    dir: TempDir,
}

impl Files {
    fn new() -> Self {
        let dir = tempdir().expect("create temp dir");
        std::fs::write(dir.path().join("escolas.toml"), SCHOOLS).expect("write directory file");
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    async fn open(&self, period: &str) -> Wizard<JsonRecordStore, JsonKeyValueStore> {
        Wizard::open(
            TomlSchoolDirectory::new(self.path("escolas.toml")),
            JsonRecordStore::new(self.path("registros.json")),
            CursorStore::new(
                JsonKeyValueStore::new(self.path("sessao.json")),
                UtilityKind::Energy,
            ),
            period.parse::<Period>().unwrap(),
            Box::new(|| {}),
        )
        .await
    }

    fn records_json(&self) -> serde_json::Value {
        let content = std::fs::read_to_string(self.path("registros.json")).unwrap();
        serde_json::from_str(&content).unwrap()
    }

    fn session_json(&self) -> serde_json::Value {
        let content = std::fs::read_to_string(self.path("sessao.json")).unwrap();
        serde_json::from_str(&content).unwrap()
    }
}

#[tokio::test]
async fn test_session_resumes_from_files_and_finishes() {
    let files = Files::new();

    let mut wizard = files.open("Outubro/2025").await;
    let names: Vec<&str> = wizard.roster().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["CEI Aurora", "EMEF Zumbi dos Palmares", "emei Beija-Flor"]
    );

    let form = wizard.form_mut().unwrap();
    form.set_field(0, CadastroField::RegistrationCode, "EN-001");
    form.set_field(0, CadastroField::Amount, "R$ 1.200,50");
    assert_eq!(assert_ok!(wizard.commit().await), Step::Viewing(1));
    assert_eq!(assert_ok!(wizard.skip().await), Step::Viewing(2));
    assert_eq!(
        files.session_json()["energia_last_index_Outubro/2025"],
        serde_json::json!("2")
    );
    drop(wizard);

    let rows = files.records_json();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows
        .iter()
        .any(|r| r["school"] == "EMEF Zumbi dos Palmares" && r["registrationCode"] == "PENDENTE"));

    let mut wizard = files.open("Outubro/2025").await;
    assert_eq!(wizard.state(), WizardState::Viewing(2));
    assert_eq!(assert_ok!(wizard.pending_count().await), 1);

    wizard
        .form_mut()
        .unwrap()
        .set_field(0, CadastroField::RegistrationCode, "EN-003");
    assert_eq!(assert_ok!(wizard.commit().await), Step::Exhausted);
    assert_eq!(wizard.state(), WizardState::Exhausted);
    assert!(files
        .session_json()
        .get("energia_last_index_Outubro/2025")
        .is_none());
}

#[tokio::test]
async fn test_next_month_carries_codes_and_pending_is_replaced() {
    let files = Files::new();

    let mut wizard = files.open("Outubro/2025").await;
    let form = wizard.form_mut().unwrap();
    form.set_field(0, CadastroField::RegistrationCode, "EN-001");
    form.set_field(0, CadastroField::MeterId, "MED-9");
    form.set_field(0, CadastroField::Amount, "R$ 80,00");
    assert_ok!(wizard.commit().await);
    drop(wizard);

    let mut wizard = files.open("Novembro/2025").await;
    assert_eq!(wizard.state(), WizardState::Viewing(0));
    assert!(matches!(wizard.resolved(), ResolvedState::Carried(_)));
    assert_eq!(wizard.form().cadastros()[0].registration_code, "EN-001");
    assert_eq!(wizard.form().cadastros()[0].meter_id, "MED-9");
    assert!(wizard.form().cadastros()[0].amount.is_empty());

    assert_ok!(wizard.skip().await);
    assert_ok!(wizard.previous().await);
    assert!(matches!(wizard.resolved(), ResolvedState::Carried(_)));

    wizard
        .form_mut()
        .unwrap()
        .set_field(0, CadastroField::Amount, "R$ 95,00");
    assert_ok!(wizard.commit().await);
    assert_eq!(assert_ok!(wizard.pending_count().await), 0);

    let rows = files.records_json();
    let november: Vec<_> = rows
        .as_array()
        .unwrap()
        .iter()
        .filter(|r| r["period"] == "Novembro/2025")
        .collect();
    assert_eq!(november.len(), 1);
    assert_eq!(november[0]["registrationCode"], "EN-001");
}

#[tokio::test]
async fn test_pending_code_cannot_hide_a_saved_bill() {
    let files = Files::new();

    let mut wizard = files.open("Dezembro/2025").await;
    let form = wizard.form_mut().unwrap();
    form.set_field(0, CadastroField::RegistrationCode, "PENDENTE");
    form.set_field(0, CadastroField::Amount, "R$ 100,00");

    assert_err!(wizard.commit().await);
    assert_eq!(wizard.state(), WizardState::Viewing(0));
    assert_eq!(assert_ok!(wizard.pending_count().await), 0);
    assert!(!files.path("registros.json").exists());
}
