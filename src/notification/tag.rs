//! 通知 tag - 由消息 ID 派生的稳定数字 ID
//!
//! 同一个消息 ID 重复投递时得到同一个 tag，系统会替换而不是叠加通知。
//! 使用 31 进制多项式哈希（UTF-16 code unit，i32 回绕），
//! 结果不依赖进程或编译器版本，和已部署客户端发出的 tag 一致。

/// 从消息 ID 计算通知 tag
pub fn notification_tag(message_id: &str) -> i32 {
    message_id
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(unit as i32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_is_deterministic() {
        assert_eq!(notification_tag("msg-1"), notification_tag("msg-1"));
        assert_ne!(notification_tag("msg-1"), notification_tag("msg-2"));
    }

    #[test]
    fn test_known_values() {
        assert_eq!(notification_tag(""), 0);
        assert_eq!(notification_tag("a"), 97);
        assert_eq!(notification_tag("42"), 1662);
        assert_eq!(notification_tag("hello"), 99162322);
    }

    #[test]
    fn test_long_id_wraps() {
        // 长 ID 会溢出回绕，不能 panic
        let id = "0:1700000000000000%31bd1c9631bd1c96-long-provider-message-id";
        assert_eq!(notification_tag(id), notification_tag(id));
    }
}
