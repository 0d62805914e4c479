//! 値オブジェクト
//!
//! ID 類は外部で採番された不透明な文字列として扱い、生成後は不変です。

use std::fmt;

use super::ValueObjectError;

/// ID の最大長（文字数）
pub const MAX_ID_LENGTH: usize = 128;

/// メッセージ本文の最大長（文字数）
pub const MAX_MESSAGE_CONTENT_LENGTH: usize = 2000;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: String) -> Result<Self, ValueObjectError> {
                if value.is_empty() {
                    return Err(ValueObjectError::Empty($label));
                }
                if value.chars().count() > MAX_ID_LENGTH {
                    return Err(ValueObjectError::TooLong {
                        field: $label,
                        max: MAX_ID_LENGTH,
                    });
                }
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValueObjectError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// ユーザー ID
    UserId,
    "user_id"
);
string_id!(
    /// ルーム ID
    RoomId,
    "room_id"
);
string_id!(
    /// クライアント ID（接続ごとに採番され、ユーザー ID とは独立）
    ClientId,
    "client_id"
);
string_id!(
    /// メッセージ ID（送信時に採番）
    MessageId,
    "message_id"
);

/// メッセージ本文
///
/// 空文字は不可、最大 [`MAX_MESSAGE_CONTENT_LENGTH`] 文字。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::Empty("content"));
        }
        if value.chars().count() > MAX_MESSAGE_CONTENT_LENGTH {
            return Err(ValueObjectError::TooLong {
                field: "content",
                max: MAX_MESSAGE_CONTENT_LENGTH,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageContent {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unix epoch ナノ秒のタイムスタンプ
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
