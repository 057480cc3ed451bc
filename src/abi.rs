use alloy::sol;

sol! {
    interface GaugeController {
        function gauges(uint256 index) external view returns (address);
    }

    interface GaugeDistributor {
        function killedGauges(address gauge) external view returns (bool);
    }

    interface Gauge {
        function symbol() external view returns (string);
    }

    interface CcipSender {
        function destinations(address gauge) external view returns (bytes receiver, uint64 chainSelector);
    }

    #[sol(rpc)]
    interface Multicall3 {
        struct Call3 {
            address target;
            bool allowFailure;
            bytes callData;
        }

        struct Result {
            bool success;
            bytes returnData;
        }

        function aggregate3(Call3[] calldata calls) external view returns (Result[] memory returnData);
    }
}
