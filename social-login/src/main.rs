use std::env;
use std::error::Error;
use std::process::ExitCode;

use social_login::models::{AccessToken, LoginPlatform};
use social_login::platforms::{PlatformProvider, QqProvider, WeiboProvider};
use social_login::services::{ConfigService, ProfileFetcher};
use social_login::utils::logger;

const USAGE: &str = "用法: social-login <qq|weibo> <access_token> <openid>";

#[tokio::main]
async fn main() -> ExitCode {
    // guard需要保存到程序退出
    let _guard = match logger::init(logger::default_log_dir()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("日志系统初始化失败: {}", e);
            None
        }
    };

    match run(env::args().skip(1).collect()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "命令执行失败");
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// 用已有凭证获取用户信息并以JSON输出
async fn run(args: Vec<String>) -> Result<(), Box<dyn Error>> {
    let [platform, access_token, openid] = args.as_slice() else {
        return Err(USAGE.into());
    };

    let platform: LoginPlatform = platform.parse()?;
    let config = ConfigService::load()?;
    let fetcher = ProfileFetcher::new(&config)?;
    let token = AccessToken::new(platform, access_token.clone(), openid.clone());

    let provider: &dyn PlatformProvider = match platform {
        LoginPlatform::Qq => &QqProvider,
        LoginPlatform::Weibo => &WeiboProvider,
    };
    provider.validate_config(&config)?;

    let profile = fetcher.fetch(provider, &config, &token).await?;
    println!("{}", serde_json::to_string_pretty(&profile)?);

    Ok(())
}
