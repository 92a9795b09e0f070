use messages::{
    decorators::{thread::Thread, timing::Timing},
    msg_fields::protocols::{
        cred_issuance::v1::ack::{AckCredentialV1, AckCredentialV1Content},
        notification::ack::{AckContent, AckDecorators, AckStatus},
        report_problem::{Description, ProblemReport, ProblemReportContent, ProblemReportDecorators},
    },
};
use uuid::Uuid;

pub const ISSUANCE_ABANDONED_CODE: &str = "issuance-abandoned";

pub fn build_problem_report_msg(
    code: &str,
    explain: Option<String>,
    thread_id: &str,
) -> ProblemReport {
    let id = Uuid::new_v4().to_string();
    let description = match explain {
        Some(en) => Description::builder().code(code.to_owned()).en(en).build(),
        None => Description::builder().code(code.to_owned()).build(),
    };
    let content = ProblemReportContent::builder()
        .description(description)
        .build();

    let decorators = ProblemReportDecorators::builder()
        .thread(Thread::builder().thid(thread_id.to_owned()).build())
        .timing(Timing::out_now())
        .build();

    ProblemReport::builder()
        .id(id)
        .content(content)
        .decorators(decorators)
        .build()
}

pub fn build_credential_ack(thread_id: &str) -> AckCredentialV1 {
    let content = AckCredentialV1Content::builder()
        .inner(AckContent::builder().status(AckStatus::Ok).build())
        .build();
    let decorators = AckDecorators::builder()
        .thread(Thread::builder().thid(thread_id.to_owned()).build())
        .timing(Timing::out_now())
        .build();

    AckCredentialV1::builder()
        .id(Uuid::new_v4().to_string())
        .content(content)
        .decorators(decorators)
        .build()
}
