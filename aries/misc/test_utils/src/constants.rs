use aries_vcx_issuance::protocols::issuance::holder::{
    record::CredentialExchangeRecord, state::HolderState,
};
use messages::{
    decorators::{attachment::Attachment, please_ack::{AckOn, PleaseAck}, thread::Thread},
    msg_fields::protocols::cred_issuance::v1::issue_credential::{
        IssueCredentialV1, IssueCredentialV1Content, IssueCredentialV1Decorators,
    },
};
use uuid::Uuid;

pub const CONNECTION_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
pub const THREAD_ID: &str = "a6d0a2d3-6d5c-4c4f-9e0b-7b1e0ad9c0f1";
pub const SCHEMA_ID: &str = "V4SGRU86Z58d6TV7PBUe6f:2:degree schema:46.58.87";
pub const CRED_DEF_ID: &str = "V4SGRU86Z58d6TV7PBUe6f:3:CL:1281:tag1";
pub const REV_REG_ID: &str =
    "V4SGRU86Z58d6TV7PBUe6f:4:V4SGRU86Z58d6TV7PBUe6f:3:CL:1281:tag1:CL_ACCUM:tag1";

pub const CREDENTIAL_JSON: &str = r#"{
  "schema_id": "V4SGRU86Z58d6TV7PBUe6f:2:degree schema:46.58.87",
  "cred_def_id": "V4SGRU86Z58d6TV7PBUe6f:3:CL:1281:tag1",
  "rev_reg_id": "V4SGRU86Z58d6TV7PBUe6f:4:V4SGRU86Z58d6TV7PBUe6f:3:CL:1281:tag1:CL_ACCUM:tag1",
  "values": {
    "name": { "raw": "Alice", "encoded": "27034640024117331033063128044004318218486816931520886405535659934417438781507" },
    "degree": { "raw": "Maths", "encoded": "46141893716124768787883390440391213307131467063478049128574766209935005211802" },
    "date": { "raw": "2018-05-28", "encoded": "23402637423876324098375043509873409683498673" },
    "age": { "raw": "25", "encoded": "25" }
  },
  "signature": { "p_credential": {}, "r_credential": null },
  "signature_correctness_proof": {},
  "rev_reg": null,
  "witness": null
}"#;

/// A credential attachment the structural verifier refuses.
pub const MALFORMED_CREDENTIAL_JSON: &str =
    r#"{"schema_id": "V4SGRU86Z58d6TV7PBUe6f:2:degree schema:46.58.87"}"#;

pub fn issue_credential_msg(thread_id: &str, credential_json: &str) -> IssueCredentialV1 {
    let content = IssueCredentialV1Content::builder()
        .credentials_attach(vec![Attachment::from_json_str("libindy-cred-0", credential_json)])
        .comment("degree credential".to_owned())
        .build();
    let decorators = IssueCredentialV1Decorators::builder()
        .thread(Thread::builder().thid(thread_id.to_owned()).build())
        .please_ack(PleaseAck::builder().on(vec![AckOn::Receipt]).build())
        .build();

    IssueCredentialV1::builder()
        .id(Uuid::new_v4().to_string())
        .content(content)
        .decorators(decorators)
        .build()
}

pub fn request_sent_record(connection_id: &str, thread_id: &str) -> CredentialExchangeRecord {
    CredentialExchangeRecord::new_holder(connection_id, thread_id, HolderState::RequestSent)
}
