//! Fixed user-facing messages, shown verbatim by the presentation layer.

pub const LOGIN_SUCCEEDED: &str = "登录成功";
pub const LOGIN_FAILED: &str = "登录失败，请检查用户名和密码";

pub const PROFILE_SUCCEEDED: &str = "获取用户信息成功";
pub const PROFILE_FAILED: &str = "获取用户信息失败";

pub const OPTIONS_SUCCEEDED: &str = "查询成功";
pub const OPTIONS_FAILED: &str = "查询失败，请稍后重试";

pub const QUERY_DATA_FAILED: &str = "获取查询数据失败";

pub const TEST_DATA_FAILED: &str = "新增数据失败";

/// Success message for `get_query_data`, embedding the result count.
pub fn query_data_succeeded(count: usize) -> String {
    format!("查询成功，共找到 {count} 条记录")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_message_embeds_count() {
        assert_eq!(query_data_succeeded(2), "查询成功，共找到 2 条记录");
        assert_eq!(query_data_succeeded(0), "查询成功，共找到 0 条记录");
    }
}
