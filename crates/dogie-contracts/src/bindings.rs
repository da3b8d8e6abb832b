//! Typed bindings for the deployed contracts and their development mocks.
//!
//! Each binding lives in its own module so the generated call and event
//! types (`TokenUriCall`, `GetTokenCounterCall`, ...) do not collide.

pub mod basic_nft {
    use ethers::prelude::abigen;

    abigen!(
        BasicNft,
        r#"[
            function mintNft() external returns (uint256)
            function tokenURI(uint256 tokenId) external view returns (string)
            function getTokenCounter() external view returns (uint256)
            function name() external view returns (string)
            function symbol() external view returns (string)
            function balanceOf(address owner) external view returns (uint256)
            function ownerOf(uint256 tokenId) external view returns (address)
            event Transfer(address indexed from, address indexed to, uint256 indexed tokenId)
        ]"#
    );
}

pub mod random_ipfs_nft {
    use ethers::prelude::abigen;

    abigen!(
        RandomIpfsNft,
        r#"[
            function requestNft() external payable returns (uint256 requestId)
            function withdraw() external
            function getMintFee() external view returns (uint256)
            function getDogTokenUris(uint256 index) external view returns (string)
            function getChanceArray() external pure returns (uint256[3])
            function getBreedFromModdedRng(uint256 moddedRng) external pure returns (uint8)
            function getTokenCounter() external view returns (uint256)
            function s_requestIdToSender(uint256 requestId) external view returns (address)
            function tokenURI(uint256 tokenId) external view returns (string)
            function name() external view returns (string)
            function symbol() external view returns (string)
            function balanceOf(address owner) external view returns (uint256)
            function ownerOf(uint256 tokenId) external view returns (address)
            function owner() external view returns (address)
            event NftRequested(uint256 indexed requestId, address requester)
            event NftMinted(uint256 tokenId, uint8 breed, address minter)
        ]"#
    );
}

pub mod dynamic_svg_nft {
    use ethers::prelude::abigen;

    abigen!(
        DynamicSvgNft,
        r#"[
            function mintNft(int256 highValue) external
            function tokenURI(uint256 tokenId) external view returns (string)
            function svgToImageURI(string svg) external pure returns (string)
            function getLowSVG() external view returns (string)
            function getHighSVG() external view returns (string)
            function getPriceFeed() external view returns (address)
            function getTokenIdToHighValue(uint256 tokenId) external view returns (int256)
            function getTokenCounter() external view returns (uint256)
            function name() external view returns (string)
            function symbol() external view returns (string)
            function ownerOf(uint256 tokenId) external view returns (address)
            event CreatedNFT(uint256 indexed tokenId, int256 highValue)
        ]"#
    );
}

pub mod vrf_coordinator_mock {
    use ethers::prelude::abigen;

    abigen!(
        VrfCoordinatorMock,
        r#"[
            function createSubscription() external returns (uint256 subId)
            function fundSubscription(uint256 subId, uint256 amount) external
            function addConsumer(uint256 subId, address consumer) external
            function consumerIsAdded(uint256 subId, address consumer) external view returns (bool)
            function fulfillRandomWords(uint256 requestId, address consumer) external
            event SubscriptionCreated(uint256 indexed subId, address owner)
        ]"#
    );
}

pub mod price_feed {
    use ethers::prelude::abigen;

    abigen!(
        PriceFeed,
        r#"[
            function decimals() external view returns (uint8)
            function description() external view returns (string)
            function latestRoundData() external view returns (uint80 roundId, int256 answer, uint256 startedAt, uint256 updatedAt, uint80 answeredInRound)
        ]"#
    );
}

pub mod mock_v3_aggregator {
    use ethers::prelude::abigen;

    abigen!(
        MockV3Aggregator,
        r#"[
            function decimals() external view returns (uint8)
            function latestAnswer() external view returns (int256)
            function latestRoundData() external view returns (uint80 roundId, int256 answer, uint256 startedAt, uint256 updatedAt, uint80 answeredInRound)
            function updateAnswer(int256 answer) external
        ]"#
    );
}

pub use basic_nft::BasicNft;
pub use dynamic_svg_nft::DynamicSvgNft;
pub use mock_v3_aggregator::MockV3Aggregator;
pub use price_feed::PriceFeed;
pub use random_ipfs_nft::RandomIpfsNft;
pub use vrf_coordinator_mock::VrfCoordinatorMock;

/// Artifact names of the compiled contracts.
pub mod names {
    pub const BASIC_NFT: &str = "BasicNft";
    pub const RANDOM_IPFS_NFT: &str = "RandomIpfsNft";
    pub const DYNAMIC_SVG_NFT: &str = "DynamicSvgNft";
    pub const VRF_COORDINATOR_MOCK: &str = "VRFCoordinatorV2_5Mock";
    pub const MOCK_V3_AGGREGATOR: &str = "MockV3Aggregator";
}
