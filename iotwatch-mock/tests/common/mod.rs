pub mod mock_session;
