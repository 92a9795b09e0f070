pub mod ack;

use derive_more::From;

use self::ack::Ack;

#[derive(Clone, Debug, From, PartialEq)]
pub enum Notification {
    Ack(Ack),
}
