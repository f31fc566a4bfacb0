use eyre::WrapErr;
use tsuki_model::{GithubRepo, GithubRepoSearch, GithubUser};
use tsuki_util::constants::{GITHUB_REPO_SEARCH, GITHUB_REPO_SEARCH_LIMIT, GITHUB_USERS};

use crate::{Client, ClientError, HttpMethod, RequestOptions, Site};

impl Client {
    /// Returns `None` if there is no user with that name.
    pub async fn github_user(&self, name: &str) -> Result<Option<GithubUser>, ClientError> {
        if !is_valid_login(name) {
            debug!(name, "Skipping github user lookup for invalid login");

            return Ok(None);
        }

        let url = format!("{GITHUB_USERS}/{name}");
        let options = RequestOptions::new().site(Site::Github);

        match self.request_json(HttpMethod::Get, &url, options).await {
            Ok(user) => Ok(Some(user)),
            Err(ClientError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Search for repositories, sorted by stars.
    ///
    /// Returns `None` if no repository matched the query.
    pub async fn github_repos(&self, query: &str) -> Result<Option<Vec<GithubRepo>>, ClientError> {
        let per_page = GITHUB_REPO_SEARCH_LIMIT.to_string();

        let params = [
            ("q", query),
            ("page", "0"),
            ("per_page", per_page.as_str()),
            ("sort", "stars"),
            ("order", "desc"),
        ];

        let params =
            serde_urlencoded::to_string(params).wrap_err("Failed to encode search query")?;

        let url = format!("{GITHUB_REPO_SEARCH}?{params}");
        let options = RequestOptions::new().site(Site::Github);

        let search: GithubRepoSearch = self.request_json(HttpMethod::Get, &url, options).await?;

        Ok((!search.items.is_empty()).then_some(search.items))
    }

    /// The public repositories of the user.
    pub async fn github_user_repos(&self, user: &GithubUser) -> Result<Vec<GithubRepo>, ClientError> {
        let options = RequestOptions::new().site(Site::Github);

        self.request_json(HttpMethod::Get, &user.repos_url, options)
            .await
    }
}

/// Github logins consist of 1 to 39 ascii alphanumerics or hyphens and can't
/// start or end with a hyphen.
fn is_valid_login(name: &str) -> bool {
    (1..=39).contains(&name.len())
        && name
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || byte == b'-')
        && !name.starts_with('-')
        && !name.ends_with('-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_validation() {
        assert!(is_valid_login("octocat"));
        assert!(is_valid_login("nxtlo"));
        assert!(is_valid_login("some-user-42"));

        assert!(!is_valid_login(""));
        assert!(!is_valid_login("foo bar"));
        assert!(!is_valid_login("a/b"));
        assert!(!is_valid_login("octocat/repos"));
        assert!(!is_valid_login("-leading"));
        assert!(!is_valid_login("trailing-"));
        assert!(!is_valid_login("../admin"));
        assert!(!is_valid_login(&"a".repeat(40)));
    }

    #[tokio::test]
    async fn invalid_login_is_no_user() {
        let client = Client::new(None);

        for name in ["foo bar", "a/b", "octocat/repos", "?q=1"] {
            let user = client.github_user(name).await.unwrap();
            assert!(user.is_none(), "{name}");
        }

        assert!(!client.is_open());
    }
}
